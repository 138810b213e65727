//! Group entity model

/// A group node in the organization graph.
///
/// The weight is a derived aggregate: it always equals the sum of the
/// current weights of the group's members and is never set directly.
#[derive(Debug, Clone)]
pub struct Group {
    /// Group name, taken from the organization table's column header
    pub name: String,
    /// Sum of `current_weight` over the group's members
    pub current_weight: f64,
}
