// Published state of a remote list.

use super::view;
use crate::error::ListError;
use crate::resource::Resource;

/// Lifecycle phase of a list controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// Parameters of one load. `page_index` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub filter: String,
}

impl ListQuery {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
            sort: None,
            filter: String::new(),
        }
    }

    #[must_use]
    pub fn page(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    #[must_use]
    pub fn sorted(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(key, direction));
        self
    }

    #[must_use]
    pub fn filtered(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Snapshot of a list controller.
///
/// `error` is set exactly when `phase` is `Failed`. `items` holds the last
/// successfully loaded page in server order after local sorting; `stale`
/// marks items that survived a failed load.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// Server-side total across all pages, ignoring the local filter.
    pub total_count: u64,
    pub total_pages: u32,
    pub page_index: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub filter_text: String,
    pub phase: ListPhase,
    pub error: Option<ListError>,
    pub stale: bool,
    /// Sequence number of the most recently issued load.
    pub generation: u64,
    visible: Vec<usize>,
}

impl<T> ListState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            page_index: 0,
            page_size,
            sort: None,
            filter_text: String::new(),
            phase: ListPhase::Idle,
            error: None,
            stale: false,
            generation: 0,
            visible: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Rows matching the current filter, in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// The query that would reproduce this state.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page_index: self.page_index,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filter: self.filter_text.clone(),
        }
    }

    pub(crate) fn mark_loading(&mut self, generation: u64) {
        self.generation = generation;
        self.phase = ListPhase::Loading;
        self.error = None;
    }

    pub(crate) fn mark_failed(&mut self, error: ListError) {
        self.phase = ListPhase::Failed;
        self.stale = !self.items.is_empty();
        self.error = Some(error);
    }

    /// Re-sort `items` and rebuild the filtered index.
    pub(crate) fn refresh_view<R: Resource<Row = T>>(&mut self) {
        if let Some(sort) = &self.sort {
            view::sort_rows::<R>(&mut self.items, sort);
        }
        self.refilter::<R>();
    }

    pub(crate) fn refilter<R: Resource<Row = T>>(&mut self) {
        self.visible = view::matching_indices::<R>(&self.items, &self.filter_text);
    }
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
