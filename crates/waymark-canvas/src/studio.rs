//! Studio mode — which drop/lift action the next tap performs

/// Interaction mode of the canvas studio
///
/// Tapping the active cursor advances to the next mode, cycling back to
/// `Inactive`. The studio is only reachable when the centered entity's
/// relationship is Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Studio {
    #[default]
    Inactive,
    DroppingAbstraction,
    DroppingEntity,
    DroppingPortal,
    Lifting,
}

impl Studio {
    /// The mode a tap on the current cursor advances to
    pub fn advanced(self) -> Studio {
        match self {
            Studio::Inactive => Studio::DroppingAbstraction,
            Studio::DroppingAbstraction => Studio::DroppingEntity,
            Studio::DroppingEntity => Studio::DroppingPortal,
            Studio::DroppingPortal => Studio::Lifting,
            Studio::Lifting => Studio::Inactive,
        }
    }

    pub fn is_inactive(self) -> bool {
        self == Studio::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_cycles_through_all_modes() {
        let mut studio = Studio::Inactive;
        let expected = [
            Studio::DroppingAbstraction,
            Studio::DroppingEntity,
            Studio::DroppingPortal,
            Studio::Lifting,
            Studio::Inactive,
        ];
        for mode in expected {
            studio = studio.advanced();
            assert_eq!(studio, mode);
        }
    }
}
