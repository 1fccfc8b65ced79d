//! Row-oriented in-memory tables

use serde::Serialize;

/// Rows of one record type, kept in insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> From<Vec<R>> for Table<R> {
    fn from(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

impl<R> Table<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Extract a numeric column
    pub fn column<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&R) -> f64,
    {
        self.rows.iter().map(f).collect()
    }

    pub fn sum<F>(&self, f: F) -> f64
    where
        F: Fn(&R) -> f64,
    {
        self.rows.iter().map(f).sum()
    }

    /// Arithmetic mean of a column. NaN on an empty table; callers check
    /// `is_empty` first.
    pub fn mean<F>(&self, f: F) -> f64
    where
        F: Fn(&R) -> f64,
    {
        self.sum(f) / self.rows.len() as f64
    }

    /// Group rows by a string key. Groups come out in the order their key
    /// first appears, rows keep their relative order within a group.
    pub fn group_by<'a, K>(&'a self, key: K) -> Vec<(&'a str, Vec<&'a R>)>
    where
        K: Fn(&'a R) -> &'a str,
    {
        let mut groups: Vec<(&'a str, Vec<&'a R>)> = Vec::new();

        for row in &self.rows {
            let k = key(row);
            match groups.iter_mut().find(|(existing, _)| *existing == k) {
                Some((_, members)) => members.push(row),
                None => groups.push((k, vec![row])),
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        id: &'static str,
        value: f64,
    }

    fn table() -> Table<Row> {
        Table::from(vec![
            Row { id: "b", value: 1.0 },
            Row { id: "a", value: 2.0 },
            Row { id: "b", value: 6.0 },
        ])
    }

    #[test]
    fn test_aggregates() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(t.sum(|r| r.value), 9.0);
        assert_eq!(t.mean(|r| r.value), 3.0);
        assert_eq!(t.column(|r| r.value), vec![1.0, 2.0, 6.0]);
    }

    #[test]
    fn test_group_by_keeps_first_appearance_order() {
        let t = table();
        let groups = t.group_by(|r| r.id);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1.iter().map(|r| r.value).collect::<Vec<_>>(), vec![1.0, 6.0]);
        assert_eq!(groups[1].0, "a");
    }

    #[test]
    fn test_empty_table() {
        let t: Table<Row> = Table::default();
        assert!(t.is_empty());
        assert!(t.group_by(|r| r.id).is_empty());
    }

    #[test]
    fn test_serializes_as_row_list() {
        let json = serde_json::to_string(&table()).unwrap();
        assert!(json.starts_with("[{"));
    }
}
