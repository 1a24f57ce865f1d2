use crate::scalar::Scalar;

/// One labeled time span for one subject.
///
/// Layout: `id | lo | hi | lbl | trt | cls | wgt | n_evs | jsn`. Many
/// examples may reference the same event sequence id. The fields are
/// defined by how a study uses them: `lbl` is a semantic label for the
/// span, `trt` a treatment/control status, `cls` a classification, `wgt`
/// an example weight, `n_evs` the number of events during the span.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Example {
    pub id: i64,
    pub lo: Option<f64>,
    pub hi: Option<f64>,
    pub label: Option<String>,
    pub treatment: Option<String>,
    pub class: Option<String>,
    pub weight: Option<f64>,
    pub n_events: Option<i64>,
    pub json: Option<String>,
}

impl Example {
    /// Positional field access for `example_field` features, in table
    /// layout order. `None` for a null field or an out-of-range index.
    pub fn field(&self, index: usize) -> Option<Scalar> {
        match index {
            0 => Some(Scalar::Int(self.id)),
            1 => self.lo.map(Scalar::Float),
            2 => self.hi.map(Scalar::Float),
            3 => self.label.clone().map(Scalar::Str),
            4 => self.treatment.clone().map(Scalar::Str),
            5 => self.class.clone().map(Scalar::Str),
            6 => self.weight.map(Scalar::Float),
            7 => self.n_events.map(Scalar::Int),
            8 => self.json.clone().map(Scalar::Str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Example {
        Example {
            id: 647_096_516,
            lo: Some(100.0),
            hi: Some(281.0),
            label: Some("rx-A:dx-X".to_string()),
            treatment: Some("c".to_string()),
            class: Some("+".to_string()),
            weight: Some(0.511_115_423_882_739_1),
            n_events: Some(13),
            json: None,
        }
    }

    #[test]
    fn positional_fields_follow_table_layout() {
        let ex = example();
        assert_eq!(ex.field(0), Some(Scalar::Int(647_096_516)));
        assert_eq!(ex.field(5), Some(Scalar::Str("+".to_string())));
        assert_eq!(ex.field(6), Some(Scalar::Float(0.511_115_423_882_739_1)));
        assert_eq!(ex.field(8), None);
        assert_eq!(ex.field(9), None);
    }
}
