/// One already-parsed row of an event table.
///
/// Layout: `id | lo | hi | cat | typ | val | jsn`. Empty fields parse to
/// `None`. A record with both times absent is a fact; any other record is
/// an event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventRecord {
    pub id: Option<i64>,
    pub lo: Option<f64>,
    pub hi: Option<f64>,
    pub cat: Option<String>,
    pub typ: Option<String>,
    pub val: Option<String>,
    pub jsn: Option<String>,
}

impl EventRecord {
    /// Whether this record describes a timeless fact.
    pub fn is_fact(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }
}
