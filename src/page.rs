//! Cursor pagination shared by every list endpoint.
//!
//! A list endpoint exposes a "get one page" primitive taking an optional resume cursor.
//! [`PageCursor`] drives that primitive page by page or exhaustively: items keep the
//! server's order and the walk stops at the first page without a continuation cursor. A
//! failure stops the walk and discards whatever [`PageCursor::collect_all`] had gathered.

// self
use crate::_prelude::*;

/// One slice of a list response plus the cursor to resume after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T, C> {
	/// Items in server order.
	pub items: Vec<T>,
	/// Cursor for the following page; `None` on the last page.
	pub next: Option<C>,
}
impl<T, C> Page<T, C> {
	/// Creates a page.
	pub fn new(items: Vec<T>, next: Option<C>) -> Self {
		Self { items, next }
	}

	/// Returns `true` when no further page exists.
	pub fn is_last(&self) -> bool {
		self.next.is_none()
	}

	/// Maps every item, keeping the cursor.
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U, C> {
		Page { items: self.items.into_iter().map(f).collect(), next: self.next }
	}

	/// Splits the page into its items and cursor.
	pub fn into_parts(self) -> (Vec<T>, Option<C>) {
		(self.items, self.next)
	}
}

/// Drives a page-fetching closure over a cursor chain.
///
/// The closure receives the cursor to resume from (`None` for the first page). An
/// optional page limit guards against a server that never returns a terminal page.
pub struct PageCursor<C, F> {
	cursor: Option<C>,
	fetch: F,
	max_pages: Option<usize>,
	fetched: usize,
	done: bool,
}
impl<C, F> PageCursor<C, F> {
	/// Starts a walk resuming from `start`.
	pub fn new(start: Option<C>, fetch: F) -> Self {
		Self { cursor: start, fetch, max_pages: None, fetched: 0, done: false }
	}

	/// Caps the number of page requests; `None` is unbounded.
	///
	/// Asking for a page beyond the cap yields [`Error::PageLimitExceeded`].
	pub fn with_page_limit(mut self, max_pages: Option<usize>) -> Self {
		self.max_pages = max_pages;

		self
	}

	/// Number of pages fetched so far.
	pub fn pages_fetched(&self) -> usize {
		self.fetched
	}

	/// Returns `true` once the terminal page has been returned.
	pub fn is_done(&self) -> bool {
		self.done
	}

	/// Cursor the next request resumes from.
	pub fn cursor(&self) -> Option<&C> {
		self.cursor.as_ref()
	}

	/// Fetches the next page, or returns `None` after the terminal page.
	///
	/// A failed fetch leaves the cursor untouched so the same page can be requested again.
	pub async fn next_page<T, Fut>(&mut self) -> Result<Option<Page<T, C>>>
	where
		C: Clone,
		F: FnMut(Option<C>) -> Fut,
		Fut: Future<Output = Result<Page<T, C>>>,
	{
		if self.done {
			return Ok(None);
		}
		if let Some(limit) = self.max_pages.filter(|limit| self.fetched >= *limit) {
			return Err(Error::PageLimitExceeded { limit });
		}

		let page = (self.fetch)(self.cursor.clone()).await?;

		self.fetched += 1;
		self.cursor = page.next.clone();
		self.done = self.cursor.is_none();

		Ok(Some(page))
	}

	/// Walks every remaining page and concatenates the items in order.
	pub async fn collect_all<T, Fut>(mut self) -> Result<Vec<T>>
	where
		C: Clone,
		F: FnMut(Option<C>) -> Fut,
		Fut: Future<Output = Result<Page<T, C>>>,
	{
		let mut items = Vec::new();

		while let Some(page) = self.next_page().await? {
			items.extend(page.items);
		}

		Ok(items)
	}
}
impl<C, F> Debug for PageCursor<C, F>
where
	C: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PageCursor")
			.field("cursor", &self.cursor)
			.field("max_pages", &self.max_pages)
			.field("fetched", &self.fetched)
			.field("done", &self.done)
			.finish_non_exhaustive()
	}
}
