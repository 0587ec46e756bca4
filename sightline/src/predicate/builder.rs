use smallvec::SmallVec;

use super::{Predicate, TermValue};

/// Accumulates predicates into boolean groups and assembles an immutable tree.
///
/// The builder owns its groups outright, so nested filter scopes can never
/// alias a shared collection: each sub-filter compiler receives the builder
/// by `&mut` and pushes typed predicates through the `add_*` methods, and
/// [build](PredicateBuilder::build) consumes the builder.
///
/// Absent values contribute nothing: `add_term` with `None`, `add_terms`
/// with an empty collection and `add_flag` with an unset flag are all
/// silent no-ops, so an empty sub-filter never produces a constraint.
///
/// # Examples
///
/// ```rust,ignore
/// use sightline::predicate::PredicateBuilder;
///
/// let mut builder = PredicateBuilder::new();
/// builder
///     .add_terms("taxon.id", vec![100077i32, 101656])
///     .add_flag("identification.verified", true);
/// let predicate = builder.build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct PredicateBuilder {
    must: SmallVec<[Predicate; 8]>,
    should: SmallVec<[Predicate; 8]>,
    must_not: SmallVec<[Predicate; 8]>,
    filter: SmallVec<[Predicate; 8]>,
}

impl PredicateBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        PredicateBuilder::default()
    }

    /// Adds a predicate to the filter (non-scoring AND) group.
    pub fn add(&mut self, predicate: Predicate) -> &mut Self {
        self.filter.push(predicate);
        self
    }

    /// Adds a predicate to the filter group when one is present.
    pub fn add_opt(&mut self, predicate: Option<Predicate>) -> &mut Self {
        if let Some(predicate) = predicate {
            self.filter.push(predicate);
        }
        self
    }

    /// Adds a predicate to the must (scoring AND) group.
    pub fn add_must(&mut self, predicate: Predicate) -> &mut Self {
        self.must.push(predicate);
        self
    }

    /// Adds a predicate to the should (OR) group.
    pub fn add_should(&mut self, predicate: Predicate) -> &mut Self {
        self.should.push(predicate);
        self
    }

    /// Adds a predicate to the must-not (negation) group.
    pub fn add_must_not(&mut self, predicate: Predicate) -> &mut Self {
        self.must_not.push(predicate);
        self
    }

    /// Adds a term predicate when the value is present.
    pub fn add_term<V>(&mut self, field: &str, value: Option<V>) -> &mut Self
    where
        V: Into<TermValue>,
    {
        if let Some(value) = value {
            self.filter.push(Predicate::term(field, value));
        }
        self
    }

    /// Adds a terms predicate when the collection is non-empty, preserving
    /// the element type.
    pub fn add_terms<V>(&mut self, field: &str, values: impl IntoIterator<Item = V>) -> &mut Self
    where
        V: Into<TermValue>,
    {
        let values: Vec<TermValue> = values.into_iter().map(Into::into).collect();
        if !values.is_empty() {
            self.filter.push(Predicate::Terms {
                field: field.to_string(),
                values,
            });
        }
        self
    }

    /// Adds `field = true` when the flag is set.
    pub fn add_flag(&mut self, field: &str, flag: bool) -> &mut Self {
        if flag {
            self.filter.push(Predicate::term(field, true));
        }
        self
    }

    /// Checks whether nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }

    /// Assembles the accumulated groups into a predicate tree.
    ///
    /// # Returns
    ///
    /// `None` when nothing was added (an absent filter contributes no
    /// constraint). A single positive predicate is returned without a
    /// `Bool` wrapper.
    pub fn build(mut self) -> Option<Predicate> {
        let total =
            self.must.len() + self.should.len() + self.must_not.len() + self.filter.len();
        if total == 0 {
            return None;
        }
        if total == 1 && self.must_not.is_empty() {
            return self
                .must
                .pop()
                .or_else(|| self.should.pop())
                .or_else(|| self.filter.pop());
        }
        Some(Predicate::Bool {
            must: self.must.into_vec(),
            should: self.should.into_vec(),
            must_not: self.must_not.into_vec(),
            filter: self.filter.into_vec(),
        })
    }
}
