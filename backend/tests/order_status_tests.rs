//! Tests for the order status machine

use shared::{OrderStatus, TransitionError};

use OrderStatus::*;

const ALL: [OrderStatus; 6] = [Pendente, Confirmado, EmProducao, Pronto, Entregue, Cancelado];

// =============================================================================
// Pipeline transitions
// =============================================================================

mod pipeline {
    use super::*;

    #[test]
    fn happy_path_runs_start_to_finish() {
        assert!(Pendente.validate_transition(Confirmado, true).is_ok());
        assert!(Confirmado.validate_transition(EmProducao, true).is_ok());
        assert!(EmProducao.validate_transition(Pronto, true).is_ok());
        assert!(Pronto.validate_transition(Entregue, true).is_ok());
    }

    #[test]
    fn cancellation_only_before_production() {
        assert!(Pendente.validate_transition(Cancelado, true).is_ok());
        assert!(Confirmado.validate_transition(Cancelado, true).is_ok());

        for from in [EmProducao, Pronto, Entregue, Cancelado] {
            assert_eq!(
                from.validate_transition(Cancelado, true),
                Err(TransitionError::NotAllowed {
                    from,
                    to: Cancelado
                })
            );
        }
    }

    #[test]
    fn no_skipping_no_going_back() {
        assert!(Pendente.validate_transition(EmProducao, true).is_err());
        assert!(Pendente.validate_transition(Entregue, true).is_err());
        assert!(Confirmado.validate_transition(Pendente, true).is_err());
        assert!(Pronto.validate_transition(EmProducao, true).is_err());
        assert!(Entregue.validate_transition(Pronto, true).is_err());
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for from in [Entregue, Cancelado] {
            for to in ALL {
                assert!(from.validate_transition(to, true).is_err());
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in ALL {
            assert!(status.validate_transition(status, true).is_err());
        }
    }

    #[test]
    fn exactly_six_transitions_exist() {
        let mut allowed = 0;
        for from in ALL {
            for to in ALL {
                if from.validate_transition(to, true).is_ok() {
                    allowed += 1;
                }
            }
        }
        assert_eq!(allowed, 6);
    }
}

// =============================================================================
// Event-date guard
// =============================================================================

mod event_date_guard {
    use super::*;

    #[test]
    fn pronto_requires_an_event_date() {
        assert_eq!(
            EmProducao.validate_transition(Pronto, false),
            Err(TransitionError::EventDateRequired)
        );
        assert!(EmProducao.validate_transition(Pronto, true).is_ok());
    }

    #[test]
    fn other_transitions_ignore_the_event_date() {
        assert!(Pendente.validate_transition(Confirmado, false).is_ok());
        assert!(Confirmado.validate_transition(EmProducao, false).is_ok());
        assert!(Pronto.validate_transition(Entregue, false).is_ok());
        assert!(Pendente.validate_transition(Cancelado, false).is_ok());
    }

    #[test]
    fn illegal_transition_reported_before_missing_date() {
        // A bad from-state wins over the date check
        assert_eq!(
            Pendente.validate_transition(Pronto, false),
            Err(TransitionError::NotAllowed {
                from: Pendente,
                to: Pronto
            })
        );
    }
}

// =============================================================================
// Wire encoding
// =============================================================================

mod encoding {
    use super::*;

    #[test]
    fn as_str_and_from_str_agree() {
        for status in ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("finalizado"), None);
        assert_eq!(OrderStatus::from_str(""), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&EmProducao).unwrap(),
            "\"em_producao\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"pronto\"").unwrap();
        assert_eq!(parsed, Pronto);
    }
}
