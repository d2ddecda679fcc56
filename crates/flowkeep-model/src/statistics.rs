// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTotal {
    pub item: String,
    pub amount: i64,
}

/// Dashboard figures for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub total_income: i64,
    pub total_expenses: i64,
    pub balance: i64,
    pub total_attendees: u64,
    /// Per-item sums in first-seen order.
    pub income_by_item: Vec<ItemTotal>,
    pub expense_by_item: Vec<ItemTotal>,
}

impl ProjectStatistics {
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = Self::default();
        for tx in transactions {
            let data = &tx.data;
            let (total, by_item) = match data.kind {
                TransactionKind::Income => {
                    stats.total_attendees += u64::from(data.count.unwrap_or(0));
                    (&mut stats.total_income, &mut stats.income_by_item)
                }
                TransactionKind::Expense => (&mut stats.total_expenses, &mut stats.expense_by_item),
            };
            *total += data.amount;
            match by_item.iter_mut().find(|entry| entry.item == data.item) {
                Some(entry) => entry.amount += data.amount,
                None => by_item.push(ItemTotal {
                    item: data.item.clone(),
                    amount: data.amount,
                }),
            }
        }
        stats.balance = stats.total_income - stats.total_expenses;
        stats
    }
}
