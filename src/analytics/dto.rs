use rust_decimal::Decimal;
use serde::Serialize;

/// Chart-ready aggregate: `labels[i]` pairs with `data[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<L> {
    pub labels: Vec<L>,
    pub data: Vec<Decimal>,
}

impl<L> FromIterator<(L, Decimal)> for Series<L> {
    fn from_iter<I: IntoIterator<Item = (L, Decimal)>>(iter: I) -> Self {
        let (labels, data) = iter.into_iter().unzip();
        Self { labels, data }
    }
}
