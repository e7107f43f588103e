//! JOIN clauses.

use crate::fragment::{FragmentRef, IntoFragment, impl_fragment_conversions};
use crate::Fragment;
use sqlweave_core::{Result, Value};

/// A JOIN keyword followed by an arbitrary clause, e.g. `t2 ON t1.id = t2.id`.
#[derive(Debug, Clone)]
pub struct Join {
    join_type: JoinType,
    clause: FragmentRef,
}

/// Types of SQL joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Bare `JOIN`
    Plain,
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// Get the SQL keyword for this join type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinType::Plain => "JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

impl Join {
    /// Create a join of the given type. `clause` is the table plus any ON or
    /// USING condition; strings are raw SQL.
    pub fn new(join_type: JoinType, clause: impl IntoFragment) -> Self {
        Self {
            join_type,
            clause: clause.into_fragment(),
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

impl Fragment for Join {
    fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let (sql, args) = self.clause.to_sql_nested()?;
        Ok((format!("{} {sql}", self.join_type.as_str()), args))
    }
}

impl_fragment_conversions!(Join);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn test_join_keywords() {
        let join = Join::new(JoinType::Left, "teams t ON t.id = h.team_id");
        assert_eq!(
            join.to_sql().unwrap().0,
            "LEFT JOIN teams t ON t.id = h.team_id"
        );
        assert_eq!(JoinType::Plain.as_str(), "JOIN");
        assert_eq!(JoinType::Cross.as_str(), "CROSS JOIN");
    }

    #[test]
    fn test_join_with_args() {
        let join = Join::new(
            JoinType::Inner,
            Expr::new("orders o ON o.customer_id = c.id AND o.total > ?", [100]),
        );
        let (sql, args) = join.to_sql().unwrap();
        assert_eq!(
            sql,
            "INNER JOIN orders o ON o.customer_id = c.id AND o.total > ?"
        );
        assert_eq!(args, vec![Value::Int(100)]);
    }
}
