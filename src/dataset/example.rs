/// One labeled, weighted training or inference instance.
///
/// Plain immutable value: created fresh for every parsed row and handed to
/// the caller, which owns it from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisedExample {
    features: Vec<f64>,
    label: f64,
    weight: f64,
}

impl SupervisedExample {
    /// Construct an example from its dense features, label and weight.
    pub fn new(features: Vec<f64>, label: f64, weight: f64) -> Self {
        Self {
            features,
            label,
            weight,
        }
    }

    /// Dense feature vector.
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Target value or class encoding.
    pub fn label(&self) -> f64 {
        self.label
    }

    /// Importance weight used when accumulating losses.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of feature entries.
    pub fn dimension(&self) -> usize {
        self.features.len()
    }

    /// Split the example into `(features, label, weight)`.
    pub fn into_parts(self) -> (Vec<f64>, f64, f64) {
        (self.features, self.label, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let example = SupervisedExample::new(vec![3.0, 1.5], 0.0, 1.0);
        assert_eq!(example.features(), &[3.0, 1.5]);
        assert_eq!(example.label(), 0.0);
        assert_eq!(example.weight(), 1.0);
        assert_eq!(example.dimension(), 2);
    }

    #[test]
    fn test_structural_equality() {
        let a = SupervisedExample::new(vec![0.0, 2.0], 1.0, 0.5);
        let b = SupervisedExample::new(vec![0.0, 2.0], 1.0, 0.5);
        assert_eq!(a, b);

        // Any differing field breaks equality
        assert_ne!(a, SupervisedExample::new(vec![0.0, 2.5], 1.0, 0.5));
        assert_ne!(a, SupervisedExample::new(vec![0.0, 2.0], 0.0, 0.5));
        assert_ne!(a, SupervisedExample::new(vec![0.0, 2.0], 1.0, 1.0));
        assert_ne!(a, SupervisedExample::new(vec![0.0], 1.0, 0.5));
    }

    #[test]
    fn test_into_parts() {
        let (features, label, weight) =
            SupervisedExample::new(vec![1.0], 2.0, 3.0).into_parts();
        assert_eq!(features, vec![1.0]);
        assert_eq!(label, 2.0);
        assert_eq!(weight, 3.0);
    }
}
