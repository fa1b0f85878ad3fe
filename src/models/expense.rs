/// One dated expense line within a period's record set.
///
/// `id` is unique within its period and assigned by the service as
/// `max(existing ids) + 1`; ids are never reused after a delete.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expense {
    pub id: u32,
    pub description: String,
    pub amount: f32,
}

impl Expense {
    pub(crate) fn new(id: u32, description: String, amount: f32) -> Self {
        Self {
            id,
            description,
            amount,
        }
    }

    pub(crate) fn is_refund(&self) -> bool {
        self.amount < 0.0
    }
}
