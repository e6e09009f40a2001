use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use thiserror::Error;

type Tree = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: u16,
    pub random_state: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            random_state: 7,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyDataset,
    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[error("feature {column} of row {row} is not finite")]
    NonFiniteFeature { row: usize, column: usize },
    #[error("label {label} on row {row} is outside the {n_classes} known classes")]
    UnknownClass {
        row: usize,
        label: usize,
        n_classes: usize,
    },
    #[error("training labels contain a single class; nothing to learn")]
    SingleClass,
    #[error("max_depth must be at least 1")]
    ZeroDepth,
    #[error("decision tree fit failed: {0}")]
    Fit(String),
}

/// smartcore decision tree fitted over class indices `0..n_classes`.
#[derive(Debug, PartialEq)]
pub struct StressTree {
    tree: Tree,
    /// Probability column -> class index. smartcore orders columns by the
    /// sorted distinct labels it saw during fit.
    classes: Vec<usize>,
    n_classes: usize,
}

impl StressTree {
    pub fn fit<const N: usize>(
        features: &[[f64; N]],
        labels: &[usize],
        n_classes: usize,
        params: TreeParams,
    ) -> Result<Self, TrainError> {
        let classes = validate(features, labels, n_classes, params)?;

        let rows: Vec<Vec<f64>> = features.iter().map(|sample| sample.to_vec()).collect();
        let x = DenseMatrix::from_2d_vec(&rows).map_err(|err| TrainError::Fit(err.to_string()))?;
        let y: Vec<u32> = labels.iter().map(|&label| label as u32).collect();

        let parameters = DecisionTreeClassifierParameters {
            max_depth: Some(params.max_depth),
            seed: Some(params.random_state),
            ..Default::default()
        };
        let tree = Tree::fit(&x, &y, parameters).map_err(|err| TrainError::Fit(err.to_string()))?;

        tracing::debug!(depth = tree.depth(), "decision tree fitted");
        Ok(Self {
            tree,
            classes,
            n_classes,
        })
    }

    /// Class probabilities for one sample, indexed by class.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>, Failed> {
        let x = DenseMatrix::from_2d_vec(&vec![sample.to_vec()])?;
        let proba = self.tree.predict_proba(&x)?;

        let mut distribution = vec![0.0; self.n_classes];
        for (column, &class) in self.classes.iter().enumerate() {
            distribution[class] = *proba.get((0, column));
        }
        Ok(distribution)
    }

    pub fn predict(&self, sample: &[f64]) -> Result<usize, Failed> {
        Ok(argmax(&self.predict_proba(sample)?).unwrap_or(0))
    }

    pub fn depth(&self) -> usize {
        usize::from(self.tree.depth())
    }

    /// Normalised impurity decrease per feature column.
    pub fn feature_importances(&self) -> Vec<f64> {
        self.tree.compute_feature_importances(true)
    }
}

/// Index of the largest value; the first one wins on exact ties.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Returns the sorted distinct classes present in `labels`.
fn validate<const N: usize>(
    features: &[[f64; N]],
    labels: &[usize],
    n_classes: usize,
    params: TreeParams,
) -> Result<Vec<usize>, TrainError> {
    if params.max_depth == 0 {
        return Err(TrainError::ZeroDepth);
    }
    if features.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    if features.len() != labels.len() {
        return Err(TrainError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }

    for (row, sample) in features.iter().enumerate() {
        if let Some(column) = sample.iter().position(|value| !value.is_finite()) {
            return Err(TrainError::NonFiniteFeature { row, column });
        }
    }

    let mut seen = vec![false; n_classes];
    for (row, &label) in labels.iter().enumerate() {
        match seen.get_mut(label) {
            Some(slot) => *slot = true,
            None => {
                return Err(TrainError::UnknownClass {
                    row,
                    label,
                    n_classes,
                })
            }
        }
    }

    let classes: Vec<usize> = (0..n_classes).filter(|&class| seen[class]).collect();
    if classes.len() < 2 {
        return Err(TrainError::SingleClass);
    }
    Ok(classes)
}
