use api_types::transaction::Transaction;

use crate::money::AmountFormat;

/// A displayed transaction. `id` is what the row's delete control acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub category: String,
    pub kind: String,
    pub amount: String,
    /// Unformatted amount, used to pre-fill the edit form.
    pub value: f64,
    pub notes: String,
}

impl TransactionRow {
    pub fn from_transaction(tx: &Transaction, format: &AmountFormat) -> Self {
        Self {
            id: tx.id,
            date: tx.date.clone(),
            title: tx.title.clone(),
            category: tx.category.clone().unwrap_or_default(),
            kind: tx.kind.clone(),
            amount: format.currency(tx.amount),
            value: tx.amount,
            notes: tx.notes.clone().unwrap_or_default(),
        }
    }
}

/// The transaction table render target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    rows: Vec<TransactionRow>,
    selected: usize,
}

impl TransactionTable {
    /// Replaces every row with `transactions`, in the order given.
    pub fn replace(&mut self, transactions: &[Transaction], format: &AmountFormat) {
        self.rows = transactions
            .iter()
            .map(|tx| TransactionRow::from_transaction(tx, format))
            .collect();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.iter().any(|row| row.id == id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TransactionRow> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.rows.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Grouping;

    fn tx(id: i64, title: &str, amount: f64) -> Transaction {
        Transaction {
            id,
            date: "2026-10-17".to_string(),
            title: title.to_string(),
            category: None,
            kind: "expense".to_string(),
            amount,
            notes: None,
        }
    }

    #[test]
    fn replace_discards_previous_rows() {
        let format = AmountFormat::new(Grouping::Western, "₹");
        let mut table = TransactionTable::default();
        table.replace(&[tx(1, "Lunch", 120.0), tx(2, "Bus pass", 600.0)], &format);
        table.replace(&[tx(3, "Rent", 12_500.5)], &format);

        assert_eq!(table.rows().len(), 1);
        assert!(!table.contains(1));
        let row = &table.rows()[0];
        assert_eq!(row.id, 3);
        assert_eq!(row.amount, "₹ 12,500.5");
        assert_eq!(row.category, "");
    }

    #[test]
    fn rows_follow_server_order() {
        let mut table = TransactionTable::default();
        table.replace(
            &[tx(9, "b", 1.0), tx(2, "a", 1.0), tx(5, "c", 1.0)],
            &AmountFormat::default(),
        );
        let ids: Vec<_> = table.rows().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn selection_is_clamped_on_replace() {
        let format = AmountFormat::default();
        let mut table = TransactionTable::default();
        table.replace(&[tx(1, "a", 1.0), tx(2, "b", 1.0), tx(3, "c", 1.0)], &format);
        table.select_next();
        table.select_next();
        table.select_next();
        assert_eq!(table.selected().map(|row| row.id), Some(3));

        table.replace(&[tx(1, "a", 1.0)], &format);
        assert_eq!(table.selected_index(), 0);

        table.replace(&[], &format);
        assert!(table.selected().is_none());
        table.select_next();
        assert_eq!(table.selected_index(), 0);
    }
}
