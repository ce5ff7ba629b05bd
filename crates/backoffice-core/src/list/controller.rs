// ── Remote list controller ──
//
// Latest-issued-wins paging over a `ResourceFetcher`. Every load takes a
// ticket from `ListState::generation`; its response is applied only if
// that ticket is still current when it arrives, and the check and the
// mutation happen inside one `send_if_modified` critical section.
//
// A delete does not take a ticket. Instead it leaves a tombstone stamped
// with the generation it saw, and a load whose ticket is not newer than
// that stamp drops the row from its response before applying it.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{ListPhase, ListQuery, ListState, SortDirection, SortSpec};
use super::{PagedResponse, ResourceFetcher};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::ListError;
use crate::resource::{Resource, RowId};
use crate::stream::StateStream;

/// What happened to the response of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response (or the local change) is now reflected in the state.
    Applied,
    /// A newer load was issued before this one finished; its response was
    /// discarded.
    Superseded,
}

/// Pages, sorts, filters, and deletes rows of `R` fetched through `F`.
///
/// Cheaply cloneable: clones share one state.
pub struct RemoteListController<R: Resource, F> {
    inner: Arc<Inner<R, F>>,
}

struct Inner<R: Resource, F> {
    fetcher: F,
    state: watch::Sender<ListState<R::Row>>,
    /// Rows deleted while a load may still be in flight. Locked only from
    /// inside a `state` critical section.
    tombstones: Mutex<Vec<Tombstone>>,
    _resource: PhantomData<fn() -> R>,
}

#[derive(Debug, Clone, Copy)]
struct Tombstone {
    id: RowId,
    generation: u64,
}

impl<R: Resource, F> Clone for RemoteListController<R, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource, F: ResourceFetcher> RemoteListController<R, F> {
    pub fn new(fetcher: F, page_size: u32) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        let (state, _) = watch::channel(ListState::new(page_size));
        Self {
            inner: Arc::new(Inner {
                fetcher,
                state,
                tombstones: Mutex::new(Vec::new()),
                _resource: PhantomData,
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ListState<R::Row> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<ListState<R::Row>> {
        StateStream::new(self.inner.state.subscribe())
    }

    pub fn phase(&self) -> ListPhase {
        self.inner.state.borrow().phase
    }

    /// Look up a loaded row by id.
    pub fn row(&self, id: RowId) -> Option<R::Row> {
        self.inner
            .state
            .borrow()
            .items
            .iter()
            .find(|r| R::row_id(r) == id)
            .cloned()
    }

    fn current_query(&self) -> ListQuery {
        self.inner.state.borrow().query()
    }

    // ── Loads ────────────────────────────────────────────────────────

    /// Initial load: the first page with the current sort and filter.
    pub async fn activate(&self) -> Result<LoadOutcome, ListError> {
        self.load(self.current_query().page(0)).await
    }

    /// Re-issue the last query.
    pub async fn refresh(&self) -> Result<LoadOutcome, ListError> {
        self.load(self.current_query()).await
    }

    /// Move to another page, keeping sort and filter.
    pub async fn load_page(&self, page_index: u32) -> Result<LoadOutcome, ListError> {
        self.load(self.current_query().page(page_index)).await
    }

    /// Fetch one page and, if no newer load was issued meanwhile, make it
    /// the current state.
    ///
    /// A failure moves the list to `Failed` (keeping the previous rows as
    /// stale) and is also returned. If this future is dropped while it is
    /// still the latest load, the list moves to `Failed` as cancelled.
    pub async fn load(&self, query: ListQuery) -> Result<LoadOutcome, ListError> {
        let page_size = if query.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            query.page_size
        };
        let page_index = query.page_index;
        let ticket = self.begin(query, page_size);

        let mut in_flight = InFlight {
            state: &self.inner.state,
            ticket,
            settled: false,
        };
        let result = self
            .inner
            .fetcher
            .get::<R::Row>(R::ENDPOINT, page_index.saturating_add(1), page_size)
            .await;
        in_flight.settled = true;

        match result {
            Ok(page) => Ok(self.finish(ticket, page)),
            Err(err) => self.fail(ticket, ListError::from(err)),
        }
    }

    /// Enter `Loading` under a fresh ticket and adopt the query's view
    /// settings so they are visible while the request is in flight.
    fn begin(&self, query: ListQuery, page_size: u32) -> u64 {
        let page = query.page_index;
        let mut ticket = 0;
        self.inner.state.send_modify(|s| {
            ticket = s.generation.wrapping_add(1);
            s.mark_loading(ticket);
            s.page_index = query.page_index;
            s.page_size = page_size;
            s.sort = query.sort;
            s.filter_text = query.filter;
            s.refresh_view::<R>();
        });
        debug!(resource = R::LABEL, ticket, page, "load issued");
        ticket
    }

    fn finish(&self, ticket: u64, page: PagedResponse<R::Row>) -> LoadOutcome {
        let rows = page.data.len();
        let applied = self.inner.state.send_if_modified(|s| {
            if s.generation != ticket {
                return false;
            }
            let p = page.pagination;
            let mut items = page.data;
            let mut total = p.total;
            {
                let mut tombstones = self.inner.tombstones.lock().unwrap_or_else(PoisonError::into_inner);
                for t in tombstones.iter().filter(|t| t.generation >= ticket) {
                    let before = items.len();
                    items.retain(|r| R::row_id(r) != t.id);
                    if items.len() < before {
                        debug!(resource = R::LABEL, id = t.id, "dropping deleted row from late response");
                        total = total.saturating_sub(1);
                    }
                }
                // No load older than this one can apply any more.
                tombstones.clear();
            }
            s.items = items;
            s.total_count = total;
            if p.page > 0 {
                s.page_index = p.page - 1;
            }
            if p.per_page > 0 {
                s.page_size = p.per_page;
            }
            s.total_pages = if p.total_pages > 0 {
                p.total_pages
            } else {
                u32::try_from(p.total.div_ceil(u64::from(s.page_size))).unwrap_or(u32::MAX)
            };
            s.phase = ListPhase::Loaded;
            s.error = None;
            s.stale = false;
            s.refresh_view::<R>();
            true
        });

        if applied {
            debug!(resource = R::LABEL, ticket, rows, "page applied");
            LoadOutcome::Applied
        } else {
            debug!(resource = R::LABEL, ticket, "discarding stale response");
            LoadOutcome::Superseded
        }
    }

    fn fail(&self, ticket: u64, err: ListError) -> Result<LoadOutcome, ListError> {
        let current = self.inner.state.send_if_modified(|s| {
            if s.generation != ticket {
                return false;
            }
            s.mark_failed(err.clone());
            true
        });

        if current {
            warn!(resource = R::LABEL, error = %err, "failed to load {}", R::LABEL);
            Err(err)
        } else {
            debug!(resource = R::LABEL, ticket, error = %err, "discarding stale failure");
            Ok(LoadOutcome::Superseded)
        }
    }

    // ── View changes ─────────────────────────────────────────────────

    /// Filter the loaded rows locally. Moves the cursor back to the first
    /// page, re-fetching it when the cursor was elsewhere.
    pub async fn apply_filter(&self, text: &str) -> Result<LoadOutcome, ListError> {
        let off_first_page = self.inner.state.borrow().page_index != 0;
        if off_first_page {
            return self.load(self.current_query().page(0).filtered(text)).await;
        }

        self.inner.state.send_modify(|s| {
            s.filter_text = text.to_owned();
            s.refilter::<R>();
        });
        Ok(LoadOutcome::Applied)
    }

    /// Reorder the loaded rows. Stable; later loads keep this order.
    pub fn set_sort(&self, key: &str, direction: SortDirection) {
        self.inner.state.send_modify(|s| {
            s.sort = Some(SortSpec::new(key, direction));
            s.refresh_view::<R>();
        });
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Delete one row remotely, then drop it locally without reloading.
    ///
    /// Unknown ids are a no-op. Rows the resource forbids deleting fail
    /// with `NotPermitted` before any remote call. Remote failures leave
    /// the list untouched.
    pub async fn delete(&self, id: RowId) -> Result<(), ListError> {
        let Some(row) = self.row(id) else {
            debug!(resource = R::LABEL, id, "delete of unknown row ignored");
            return Ok(());
        };
        if !R::can_delete(&row) {
            return Err(ListError::NotPermitted { id });
        }

        let path = format!("{}/{id}", R::ENDPOINT);
        if let Err(e) = self.inner.fetcher.delete(&path).await {
            let err = ListError::from(e);
            warn!(resource = R::LABEL, id, error = %err, "delete failed");
            return Err(err);
        }

        self.inner.state.send_if_modified(|s| {
            self.inner
                .tombstones
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Tombstone {
                    id,
                    generation: s.generation,
                });
            let before = s.items.len();
            s.items.retain(|r| R::row_id(r) != id);
            if s.items.len() == before {
                return false;
            }
            s.total_count = s.total_count.saturating_sub(1);
            s.refilter::<R>();
            true
        });
        info!(resource = R::LABEL, id, "row deleted");
        Ok(())
    }
}

/// Marks the list cancelled if a load future is dropped mid-request.
struct InFlight<'a, T> {
    state: &'a watch::Sender<ListState<T>>,
    ticket: u64,
    settled: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let ticket = self.ticket;
        self.state.send_if_modified(|s| {
            if s.generation != ticket || s.phase != ListPhase::Loading {
                return false;
            }
            s.mark_failed(ListError::Unknown {
                message: "request cancelled".into(),
            });
            true
        });
    }
}
