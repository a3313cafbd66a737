use serde::{Deserialize, Serialize};

/// Logical movement action, decoupled from the physical key that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
    ];

    /// Bit used in the packed key mask
    pub const fn bit(self) -> u8 {
        match self {
            Action::MoveForward => 1 << 0,
            Action::MoveBack => 1 << 1,
            Action::MoveLeft => 1 << 2,
            Action::MoveRight => 1 << 3,
        }
    }
}

/// Controller - answers which movement actions are held
pub trait Controller {
    /// Check if action is currently held
    fn is_down(&self, action: Action) -> bool;

    /// All currently held actions, in `Action::ALL` order
    fn down_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.is_down(*action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_action_bits_unique() {
        let bits: HashSet<u8> = Action::ALL.iter().map(|a| a.bit()).collect();
        assert_eq!(bits.len(), 4);
        assert!(bits.iter().all(|b| b.count_ones() == 1));
    }

    #[test]
    fn test_action_debug() {
        assert_eq!(format!("{:?}", Action::MoveForward), "MoveForward");
    }

    // Test mock controller implementation
    struct MockController {
        pressed: Vec<Action>,
    }

    impl Controller for MockController {
        fn is_down(&self, action: Action) -> bool {
            self.pressed.contains(&action)
        }
    }

    #[test]
    fn test_down_actions_in_canonical_order() {
        let controller = MockController {
            pressed: vec![Action::MoveRight, Action::MoveForward],
        };
        assert_eq!(
            controller.down_actions(),
            vec![Action::MoveForward, Action::MoveRight]
        );
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController { pressed: vec![] };
        assert!(controller.down_actions().is_empty());
        assert!(!controller.is_down(Action::MoveBack));
    }
}
