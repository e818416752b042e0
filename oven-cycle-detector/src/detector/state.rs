//! Baking-cycle state machine definition
//!
//! The whole protocol lives in [`transition`]: a pure function from the current
//! state and an event code to the next state and the buffer action the
//! detector has to perform. It touches no records, so it can be checked row by
//! row against the protocol table.

use crate::types::codes;
use std::fmt;

/// Detector states, in protocol order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Waiting for a program to be selected
    #[default]
    ProgramChoice,
    /// Program selected, waiting for preheating to complete
    PreheatingCompletion,
    /// Preheated, door may be opened any number of times until closed
    DoorOpenClose,
    /// Door closed and confirmed, waiting for baking to start
    BakingStart,
    /// Baking, waiting for finish, abort or interruption
    BakingFinish,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::ProgramChoice => write!(f, "ProgramChoice"),
            State::PreheatingCompletion => write!(f, "PreheatingCompletion"),
            State::DoorOpenClose => write!(f, "DoorOpenClose"),
            State::BakingStart => write!(f, "BakingStart"),
            State::BakingFinish => write!(f, "BakingFinish"),
        }
    }
}

/// What the detector does with its attempt buffer after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Keep accumulating
    None,
    /// Attempt complete: move the buffer into the saved sequences
    Save,
    /// Attempt broken: drop the buffer
    ResetDiscard,
    /// Attempt broken by a new program selection: the triggering record
    /// becomes the whole buffer
    ResetRestart,
}

/// Evaluate the protocol table for one event code
pub fn transition(state: State, event_id: i64) -> (State, Action) {
    match (state, event_id) {
        (State::ProgramChoice, codes::PROGRAM_SELECTED) => {
            (State::PreheatingCompletion, Action::None)
        }
        (State::PreheatingCompletion, codes::PREHEAT_COMPLETED) => {
            (State::DoorOpenClose, Action::None)
        }
        (State::DoorOpenClose, codes::DOOR_OPENED) => (State::DoorOpenClose, Action::None),
        (State::DoorOpenClose, codes::DOOR_CLOSED) => (State::BakingStart, Action::None),
        (State::BakingStart, codes::BAKING_STARTED) => (State::BakingFinish, Action::None),
        (State::BakingFinish, code) if codes::is_terminal(code) => {
            (State::ProgramChoice, Action::Save)
        }
        (_, codes::PROGRAM_SELECTED) => (State::PreheatingCompletion, Action::ResetRestart),
        _ => (State::ProgramChoice, Action::ResetDiscard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [State; 5] = [
        State::ProgramChoice,
        State::PreheatingCompletion,
        State::DoorOpenClose,
        State::BakingStart,
        State::BakingFinish,
    ];

    #[test]
    fn test_protocol_path() {
        assert_eq!(
            transition(State::ProgramChoice, 15),
            (State::PreheatingCompletion, Action::None)
        );
        assert_eq!(
            transition(State::PreheatingCompletion, 1),
            (State::DoorOpenClose, Action::None)
        );
        assert_eq!(
            transition(State::DoorOpenClose, 21),
            (State::BakingStart, Action::None)
        );
        assert_eq!(
            transition(State::BakingStart, 16),
            (State::BakingFinish, Action::None)
        );
    }

    #[test]
    fn test_door_self_loop() {
        assert_eq!(
            transition(State::DoorOpenClose, 20),
            (State::DoorOpenClose, Action::None)
        );
    }

    #[test]
    fn test_all_terminal_codes_save() {
        for code in [17, 18, 8] {
            assert_eq!(
                transition(State::BakingFinish, code),
                (State::ProgramChoice, Action::Save),
                "code {}",
                code
            );
        }
    }

    #[test]
    fn test_terminal_codes_outside_baking_finish_reset() {
        for state in [
            State::ProgramChoice,
            State::PreheatingCompletion,
            State::DoorOpenClose,
            State::BakingStart,
        ] {
            for code in [17, 18, 8] {
                assert_eq!(
                    transition(state, code),
                    (State::ProgramChoice, Action::ResetDiscard)
                );
            }
        }
    }

    #[test]
    fn test_program_selection_restarts_from_every_other_state() {
        for state in ALL_STATES.into_iter().filter(|s| *s != State::ProgramChoice) {
            assert_eq!(
                transition(state, 15),
                (State::PreheatingCompletion, Action::ResetRestart),
                "state {}",
                state
            );
        }
    }

    #[test]
    fn test_unknown_code_discards_everywhere() {
        for state in ALL_STATES {
            assert_eq!(
                transition(state, 99),
                (State::ProgramChoice, Action::ResetDiscard)
            );
            assert_eq!(
                transition(state, -1),
                (State::ProgramChoice, Action::ResetDiscard)
            );
        }
    }

    #[test]
    fn test_out_of_place_protocol_codes_discard() {
        assert_eq!(
            transition(State::ProgramChoice, 1),
            (State::ProgramChoice, Action::ResetDiscard)
        );
        assert_eq!(
            transition(State::PreheatingCompletion, 20),
            (State::ProgramChoice, Action::ResetDiscard)
        );
        assert_eq!(
            transition(State::BakingStart, 20),
            (State::ProgramChoice, Action::ResetDiscard)
        );
        assert_eq!(
            transition(State::BakingFinish, 16),
            (State::ProgramChoice, Action::ResetDiscard)
        );
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(State::default(), State::ProgramChoice);
    }
}
