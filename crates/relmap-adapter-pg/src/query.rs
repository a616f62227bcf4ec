//! Catalog query builder.
//!
//! Predicates are accumulated together with their bound values so that
//! placeholder numbers and parameters can never drift apart. Column names are
//! `&'static str`; only values are caller supplied, and those are always bound.

use relmap_relations::CatalogError;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

#[derive(Debug, Clone)]
enum Predicate {
    Fixed(&'static str),
    Eq(&'static str),
    Like {
        column: &'static str,
        case_sensitive: bool,
    },
}

/// A `SELECT` over the catalog with bound filter values.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    select: &'static str,
    predicates: Vec<Predicate>,
    params: Vec<String>,
    order_by: Vec<&'static str>,
}

impl CatalogQuery {
    /// Start from a `SELECT ... FROM ...` fragment without a `WHERE` clause.
    pub fn new(select: &'static str) -> Self {
        Self {
            select,
            predicates: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// A constant condition with no bound value.
    pub fn condition(mut self, condition: &'static str) -> Self {
        self.predicates.push(Predicate::Fixed(condition));
        self
    }

    /// `column = $n`
    pub fn filter_eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Eq(column));
        self.params.push(value.into());
        self
    }

    /// `column LIKE $n` or `column ILIKE $n`.
    pub fn filter_like(
        mut self,
        column: &'static str,
        pattern: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        self.predicates.push(Predicate::Like {
            column,
            case_sensitive,
        });
        self.params.push(pattern.into());
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_by.push(column);
        self
    }

    /// The SQL text with `$1..$n` placeholders.
    pub fn sql(&self) -> String {
        let mut sql = self.select.trim().to_string();

        if !self.predicates.is_empty() {
            let mut placeholder = 0;
            let clauses: Vec<String> = self
                .predicates
                .iter()
                .map(|predicate| match predicate {
                    Predicate::Fixed(condition) => condition.to_string(),
                    Predicate::Eq(column) => {
                        placeholder += 1;
                        format!("{} = ${}", column, placeholder)
                    }
                    Predicate::Like {
                        column,
                        case_sensitive,
                    } => {
                        placeholder += 1;
                        let op = if *case_sensitive { "LIKE" } else { "ILIKE" };
                        format!("{} {} ${}", column, op, placeholder)
                    }
                })
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        sql
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// SQL text and bound arguments, ready for `sqlx::query_with`.
    pub fn build(&self) -> Result<(String, PgArguments), CatalogError> {
        let mut args = PgArguments::default();
        for param in &self.params {
            args.add(param.clone())
                .map_err(|e| CatalogError::unavailable(format!("failed to bind parameter: {}", e)))?;
        }
        Ok((self.sql(), args))
    }
}
