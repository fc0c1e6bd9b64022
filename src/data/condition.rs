use super::instance::Instance;

// ---------------------------------------------------------------------------
// Condition – predicate over a decoded instance
// ---------------------------------------------------------------------------

/// Row-selection predicate used by [`Data::subset`](super::Data::subset).
///
/// `value` is compared against the instance's feature slot, so categorical
/// features are matched by code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Equals { feature: usize, value: f64 },
    Lesser { feature: usize, value: f64 },
    GreaterOrEquals { feature: usize, value: f64 },
}

impl Condition {
    /// # Panics
    ///
    /// If the condition's feature is out of range for `instance`.
    pub fn is_true_for(&self, instance: &Instance) -> bool {
        match *self {
            Condition::Equals { feature, value } => instance.get(feature) == value,
            Condition::Lesser { feature, value } => instance.get(feature) < value,
            Condition::GreaterOrEquals { feature, value } => instance.get(feature) >= value,
        }
    }

    pub fn feature(&self) -> usize {
        match *self {
            Condition::Equals { feature, .. }
            | Condition::Lesser { feature, .. }
            | Condition::GreaterOrEquals { feature, .. } => feature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesser_and_greater_partition_values() {
        let insts = [
            Instance::new(0, vec![0.5], 0),
            Instance::new(1, vec![1.0], 0),
            Instance::new(2, vec![1.5], 1),
        ];
        let lt = Condition::Lesser { feature: 0, value: 1.0 };
        let ge = Condition::GreaterOrEquals { feature: 0, value: 1.0 };

        for inst in &insts {
            assert_ne!(lt.is_true_for(inst), ge.is_true_for(inst));
        }
        assert!(lt.is_true_for(&insts[0]));
        assert!(ge.is_true_for(&insts[1]));
        assert_eq!(ge.feature(), 0);
    }
}
