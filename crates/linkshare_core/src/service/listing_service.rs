//! Listing use-case service.
//!
//! # Responsibility
//! - Fetch every record for display, fresh on every call.

use crate::model::record::Record;
use crate::store::{RecordStore, StorageResult};
use std::sync::Arc;

/// Finite sequence of records from one `list_all` query.
///
/// Consumed once; a new call to [`ListingService::entries`] re-queries.
#[derive(Debug)]
pub struct Listing {
    rows: std::vec::IntoIter<Record>,
}

impl Iterator for Listing {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Listing {}

/// Read-side service behind the listing page.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn RecordStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Queries the store and returns its records oldest first.
    ///
    /// No caching: two calls issue two queries.
    pub async fn entries(&self) -> StorageResult<Listing> {
        let records = self.store.list_all().await?;
        Ok(Listing {
            rows: records.into_iter(),
        })
    }
}
