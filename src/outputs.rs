/// The crisp result for one output variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    pub variable: String,
    /// Center of gravity of the aggregated sets
    pub value: f64,
    /// Name of the set with the highest aggregated membership
    pub label: String,
}

/// Results in the order the output variables were declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs(pub(crate) Vec<Output>);

impl Outputs {
    pub(crate) fn new(outputs: Vec<Output>) -> Self {
        Self(outputs)
    }

    pub fn get(&self, variable: &str) -> Option<&Output> {
        self.0.iter().find(|o| o.variable == variable)
    }

    pub fn get_inferred_value(&self, variable: &str) -> Option<f64> {
        self.get(variable).map(|o| o.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Output> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(crisp value, dominant label)` per output variable.
    pub fn to_pairs(&self) -> Vec<(f64, String)> {
        self.0.iter().map(|o| (o.value, o.label.clone())).collect()
    }
}

impl IntoIterator for Outputs {
    type Item = Output;
    type IntoIter = std::vec::IntoIter<Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
