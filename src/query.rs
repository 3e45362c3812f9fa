//! Query descriptors for the census collaborator.
//!
//! A [`Query`] selects records of one collection by equality terms and can
//! follow a chain of [`Join`]s into related collections. The records a query
//! yields are those of its *target collection*: the deepest join in the chain,
//! or the query's own collection when there are no joins.
//!
//! ```
//! use census_kit::query::{Join, Query};
//!
//! // Item linked to weapon 80 through the item_to_weapon table
//! let query = Query::new("item_to_weapon")
//!     .term("weapon_id", 80)
//!     .join(Join::new("item").on("item_id"));
//!
//! assert_eq!(query.target_collection(), "item");
//! ```

use std::fmt;

/// Filter and join descriptor for [`CensusSource::fetch_by_join`].
///
/// [`CensusSource::fetch_by_join`]: crate::source::CensusSource::fetch_by_join
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    /// Equality terms; dotted fields address nested values (`name.en`).
    pub terms: Vec<(String, String)>,
    pub limit: Option<u32>,
    pub join: Option<Join>,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Self {
        Query {
            collection: collection.into(),
            terms: Vec::new(),
            limit: None,
            join: None,
        }
    }

    /// Single-record lookup by id field.
    pub fn by_id(collection: &str, id_field: &str, id: impl fmt::Display) -> Self {
        Query::new(collection).term(id_field, id).limit(1)
    }

    pub fn term(mut self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.terms.push((field.into(), value.to_string()));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.join = Some(join);
        self
    }

    /// Collection whose records this query yields.
    pub fn target_collection(&self) -> &str {
        match &self.join {
            Some(join) => join.target_collection(),
            None => &self.collection,
        }
    }

    /// Joins from outermost to innermost.
    pub fn joins(&self) -> JoinChain<'_> {
        JoinChain {
            next: self.join.as_ref(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        let mut sep = '?';
        for (field, value) in &self.terms {
            write!(f, "{}{}={}", sep, field, value)?;
            sep = '&';
        }
        if let Some(limit) = self.limit {
            write!(f, "{}c:limit={}", sep, limit)?;
            sep = '&';
        }
        if let Some(join) = &self.join {
            write!(f, "{}c:join={}", sep, join)?;
        }
        Ok(())
    }
}

/// One hop from a parent collection into a related collection.
///
/// Parent records are matched to child records where
/// `parent[on] == child[to]`. `on` defaults to `{collection}_id` and `to`
/// defaults to `on`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub collection: String,
    pub parent_field: Option<String>,
    pub child_field: Option<String>,
    pub terms: Vec<(String, String)>,
    pub join: Option<Box<Join>>,
}

impl Join {
    pub fn new(collection: impl Into<String>) -> Self {
        Join {
            collection: collection.into(),
            parent_field: None,
            child_field: None,
            terms: Vec::new(),
            join: None,
        }
    }

    /// Field on the parent record.
    pub fn on(mut self, field: impl Into<String>) -> Self {
        self.parent_field = Some(field.into());
        self
    }

    /// Field on the joined record.
    pub fn to(mut self, field: impl Into<String>) -> Self {
        self.child_field = Some(field.into());
        self
    }

    pub fn term(mut self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.terms.push((field.into(), value.to_string()));
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.join = Some(Box::new(join));
        self
    }

    pub fn on_field(&self) -> String {
        self.parent_field
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.collection))
    }

    pub fn to_field(&self) -> String {
        self.child_field.clone().unwrap_or_else(|| self.on_field())
    }

    /// Key under which the census API injects this join into its parent.
    pub fn inject_key(&self) -> String {
        format!("{}_join_{}", self.on_field(), self.collection)
    }

    pub fn target_collection(&self) -> &str {
        match &self.join {
            Some(inner) => inner.target_collection(),
            None => &self.collection,
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}^on:{}^to:{}^list:1",
            self.collection,
            self.on_field(),
            self.to_field()
        )?;
        if !self.terms.is_empty() {
            let terms: Vec<String> = self
                .terms
                .iter()
                .map(|(field, value)| format!("{}={}", field, value))
                .collect();
            write!(f, "^terms:{}", terms.join("'"))?;
        }
        if let Some(inner) = &self.join {
            write!(f, "({})", inner)?;
        }
        Ok(())
    }
}

/// Iterator over a query's join chain.
pub struct JoinChain<'a> {
    next: Option<&'a Join>,
}

impl<'a> Iterator for JoinChain<'a> {
    type Item = &'a Join;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.join.as_deref();
        Some(current)
    }
}
