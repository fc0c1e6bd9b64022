use std::io::Write;

use super::condition::Condition;
use super::dataset::Dataset;
use super::vocabulary::Code;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Instance – one decoded row
// ---------------------------------------------------------------------------

/// A decoded row: dense feature vector plus label code.
///
/// `values[i]` is the parsed number for a numerical feature and the code (as
/// `f64`) for a categorical one.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    id: usize,
    values: Vec<f64>,
    label: Code,
}

impl Instance {
    pub fn new(id: usize, values: Vec<f64>, label: Code) -> Self {
        Instance { id, values, label }
    }

    /// Position among the successfully loaded rows.
    pub fn id(&self) -> usize {
        self.id
    }

    /// # Panics
    ///
    /// If `feature` is out of range.
    pub fn get(&self, feature: usize) -> f64 {
        self.values[feature]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn label(&self) -> Code {
        self.label
    }
}

// ---------------------------------------------------------------------------
// Data – the loaded instance sequence
// ---------------------------------------------------------------------------

/// Instances in source row order, tied to the [`Dataset`] that decoded them.
#[derive(Debug, Clone)]
pub struct Data<'a> {
    dataset: &'a Dataset,
    instances: Vec<Instance>,
}

impl<'a> Data<'a> {
    pub fn new(dataset: &'a Dataset, instances: Vec<Instance>) -> Self {
        Data { dataset, instances }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance at position `index`; ids match positions for freshly loaded data.
    pub fn get(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances.iter()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Label code of every instance, in order.
    pub fn labels(&self) -> Vec<Code> {
        self.instances.iter().map(Instance::label).collect()
    }

    /// Occurrences of each label code, indexed by code.
    ///
    /// # Panics
    ///
    /// If an instance carries a label code `>= dataset().n_labels()`, which
    /// cannot happen for instances decoded against the same dataset.
    pub fn count_labels(&self) -> Vec<usize> {
        let mut counts = vec![0; self.dataset.n_labels()];
        for inst in &self.instances {
            counts[inst.label as usize] += 1;
        }
        counts
    }

    /// Most frequent label; ties go to the lowest code.
    pub fn majority_label(&self) -> Option<Code> {
        if self.instances.is_empty() {
            return None;
        }
        let counts = self.count_labels();
        let mut best = 0;
        for (code, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = code;
            }
        }
        Some(best as Code)
    }

    /// `true` when every instance carries the same label (vacuously for none).
    pub fn identical_label(&self) -> bool {
        match self.instances.first() {
            Some(first) => self.instances.iter().all(|i| i.label == first.label),
            None => true,
        }
    }

    /// `true` when every instance has the same feature vector.
    pub fn is_identical(&self) -> bool {
        match self.instances.first() {
            Some(first) => self.instances.iter().all(|i| i.values == first.values),
            None => true,
        }
    }

    /// Distinct values taken by `feature`, ascending.
    ///
    /// # Panics
    ///
    /// If `feature >= dataset().n_features()`.
    pub fn values(&self, feature: usize) -> Vec<f64> {
        let mut values: Vec<f64> = self.instances.iter().map(|i| i.get(feature)).collect();
        values.sort_by(f64::total_cmp);
        values.dedup_by(|a, b| a.total_cmp(b).is_eq());
        values
    }

    /// Instances satisfying `condition`. Ids are kept as loaded.
    pub fn subset(&self, condition: &Condition) -> Data<'a> {
        let instances = self
            .instances
            .iter()
            .filter(|inst| condition.is_true_for(inst))
            .cloned()
            .collect();
        Data::new(self.dataset, instances)
    }

    /// Write the encoded instances as CSV: `id,f0,…,f{n-1},label`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.dataset.n_features() + 2);
        header.push("id".to_string());
        header.extend((0..self.dataset.n_features()).map(|f| format!("f{f}")));
        header.push("label".to_string());
        out.write_record(&header)?;

        for inst in &self.instances {
            let mut record = Vec::with_capacity(inst.values.len() + 2);
            record.push(inst.id.to_string());
            record.extend(inst.values.iter().map(f64::to_string));
            record.push(inst.label.to_string());
            out.write_record(&record)?;
        }

        out.flush()?;
        Ok(())
    }
}

impl<'a, 'b> IntoIterator for &'b Data<'a> {
    type Item = &'b Instance;
    type IntoIter = std::slice::Iter<'b, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::descriptor::Descriptor;
    use crate::data::vocabulary::Vocabulary;

    fn dataset() -> Dataset {
        let descriptor = Descriptor::parse("N,C,L").unwrap();
        let colors: Vocabulary = ["red", "blue"].into_iter().collect();
        let labels: Vocabulary = ["yes", "no", "maybe"].into_iter().collect();
        Dataset::from_parts(descriptor, vec![None, Some(colors), Some(labels)]).unwrap()
    }

    fn instances() -> Vec<Instance> {
        vec![
            Instance::new(0, vec![1.0, 0.0], 0),
            Instance::new(1, vec![2.0, 1.0], 1),
            Instance::new(2, vec![1.0, 0.0], 1),
            Instance::new(3, vec![3.0, 0.0], 0),
        ]
    }

    #[test]
    fn label_statistics() {
        let ds = dataset();
        let data = Data::new(&ds, instances());
        assert_eq!(data.labels(), vec![0, 1, 1, 0]);
        assert_eq!(data.count_labels(), vec![2, 2, 0]);
        assert_eq!(data.majority_label(), Some(0));
        assert!(!data.identical_label());
        assert!(!data.is_identical());
    }

    #[test]
    fn empty_data_is_trivially_identical() {
        let ds = dataset();
        let data = Data::new(&ds, Vec::new());
        assert!(data.is_empty());
        assert!(data.identical_label());
        assert!(data.is_identical());
        assert_eq!(data.majority_label(), None);
    }

    #[test]
    fn distinct_values_are_sorted() {
        let ds = dataset();
        let data = Data::new(&ds, instances());
        assert_eq!(data.values(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(data.values(1), vec![0.0, 1.0]);
    }

    #[test]
    #[should_panic]
    fn foreign_label_code_panics_in_count() {
        let ds = dataset();
        Data::new(&ds, vec![Instance::new(0, vec![1.0, 0.0], 5)]).count_labels();
    }

    #[test]
    #[should_panic]
    fn out_of_range_feature_panics_in_values() {
        let ds = dataset();
        Data::new(&ds, instances()).values(2);
    }

    #[test]
    fn subset_keeps_ids() {
        let ds = dataset();
        let data = Data::new(&ds, instances());
        let reds = data.subset(&Condition::Equals { feature: 1, value: 0.0 });
        let ids: Vec<usize> = reds.iter().map(Instance::id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn writes_encoded_csv() {
        let ds = dataset();
        let data = Data::new(&ds, instances()[..2].to_vec());
        let mut buf = Vec::new();
        data.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "id,f0,f1,label\n0,1,0,0\n1,2,1,1\n");
    }
}
