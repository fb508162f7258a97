// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Flattening of two-level (parent, then children-per-parent) listings.
//!
//! Some control-plane traversals are naturally nested: to list every image
//! in a catalog one must list the publishers, and then list the images of
//! each publisher. Both levels are paginated. [FlattenedPaginator] presents
//! such a traversal as a single lazy page sequence over all children of all
//! parents, in parent order and then child order, skipping parents with no
//! children.
//!
//! The flattener holds at most the current child page plus the first page
//! of the next non-empty parent, so memory use is bounded by the page size
//! rather than by the total item count.

use crate::paginator::{PageableResponse, Paginator};
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::pin::Pin;

/// Produces the pages of the children of a single parent.
///
/// Loading is lazy: building the paginator performs no I/O. The loader may
/// return a paginator that yields no items at all, in which case the parent
/// is skipped.
pub trait ChildLoader<P> {
    /// The page type of the child listing.
    type Page: PageableResponse + Send + 'static;
    /// The error type of the child listing.
    type Error: Send + 'static;

    /// Returns a fresh page sequence over the children of `parent`.
    fn load(&mut self, parent: P) -> Paginator<Self::Page, Self::Error>;
}

impl<P, F, CP, E> ChildLoader<P> for F
where
    F: FnMut(P) -> Paginator<CP, E>,
    CP: PageableResponse + Send + 'static,
    E: Send + 'static,
{
    type Page = CP;
    type Error = E;

    fn load(&mut self, parent: P) -> Paginator<CP, E> {
        self(parent)
    }
}

/// A single flat page sequence over the children of every parent.
///
/// Pages are yielded in parent order, then child-list order within each
/// parent. Every yielded page contains at least one item; parents with no
/// children simply do not contribute a page boundary. An entirely empty
/// traversal produces a stream that ends without yielding anything.
///
/// Any failure fetching a parent page or a child page is yielded once and
/// ends the stream. No retries happen at this layer.
#[pin_project]
pub struct FlattenedPaginator<C, E> {
    #[pin]
    stream: Pin<Box<dyn Stream<Item = Result<Vec<C>, E>> + Send>>,
}

/// The internal state of the flattening state machine.
///
/// `current` is the child page sequence being drained. `next_up` holds the
/// first non-empty page of the following parent, fetched eagerly when
/// `current` is established so that exhaustion of `current` never surfaces
/// as an artificial page boundary.
struct State<S, L, C, E>
where
    L: ChildLoader<C>,
{
    parents: S,
    loader: L,
    current: Option<Paginator<L::Page, L::Error>>,
    next_up: Option<(Vec<<L::Page as PageableResponse>::PageItem>, Paginator<L::Page, L::Error>)>,
    done: bool,
    _marker: std::marker::PhantomData<(C, E)>,
}

impl<C, E> FlattenedPaginator<C, E>
where
    C: Send + 'static,
    E: Send + 'static,
{
    /// Creates a flattened page sequence from a stream of parents and a
    /// loader producing each parent's child listing.
    pub fn new<S, P, L>(parents: S, loader: L) -> Self
    where
        S: Stream<Item = Result<P, E>> + Unpin + Send + 'static,
        P: Send + 'static,
        L: ChildLoader<P, Error = E> + Send + 'static,
        L::Page: PageableResponse<PageItem = C>,
    {
        let state = State::<S, L, P, E> {
            parents,
            loader,
            current: None,
            next_up: None,
            done: false,
            _marker: std::marker::PhantomData,
        };
        let stream = futures::stream::unfold(state, |mut state| async move {
            if state.done {
                return None;
            }
            let step = state.advance().await;
            if step.is_none() {
                state.done = true;
            }
            if let Some(Err(_)) = &step {
                state.done = true;
            }
            step.map(|page| (page, state))
        });
        // Fused so that polling past the end stays terminated instead of
        // panicking inside the unfold adapter.
        Self {
            stream: Box::pin(stream.fuse()),
        }
    }

    /// Returns the next page of the flattened sequence.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }

    /// Converts this paginator into one yielding individual items rather
    /// than pages.
    pub fn items(self) -> FlattenedItems<C, E>
    where
        C: Unpin,
    {
        FlattenedItems {
            pages: self,
            current: Vec::new().into_iter(),
        }
    }
}

impl<S, P, L, E> State<S, L, P, E>
where
    S: Stream<Item = Result<P, E>> + Unpin,
    L: ChildLoader<P, Error = E>,
{
    /// Yields the next non-empty child page, or `None` at the true end.
    async fn advance(
        &mut self,
    ) -> Option<Result<Vec<<L::Page as PageableResponse>::PageItem>, E>> {
        loop {
            if self.current.is_none() {
                // Establish the first non-empty parent, then eagerly fetch
                // the first page of the one after it.
                return match self.find_next_nonempty().await {
                    Err(e) => Some(Err(e)),
                    Ok(None) => None,
                    Ok(Some((first, pages))) => {
                        self.current = Some(pages);
                        match self.prefetch().await {
                            Err(e) => Some(Err(e)),
                            Ok(()) => Some(Ok(first)),
                        }
                    }
                };
            }
            let page = if let Some(current) = self.current.as_mut() {
                current.next().await
            } else {
                None
            };
            match page {
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(page)) => {
                    let items = page.items();
                    // An empty page inside a child listing is not a page
                    // boundary of the flattened sequence.
                    if items.is_empty() {
                        continue;
                    }
                    return Some(Ok(items));
                }
                None => {
                    // The current parent is exhausted. Fall through to the
                    // pre-fetched parent, if any, and pre-fetch the next.
                    let Some((first, pages)) = self.next_up.take() else {
                        return None;
                    };
                    self.current = Some(pages);
                    return match self.prefetch().await {
                        Err(e) => Some(Err(e)),
                        Ok(()) => Some(Ok(first)),
                    };
                }
            }
        }
    }

    async fn prefetch(&mut self) -> Result<(), E> {
        self.next_up = self.find_next_nonempty().await?;
        Ok(())
    }

    /// Scans forward for the next parent with at least one child, returning
    /// that parent's first non-empty page and its remaining page sequence.
    async fn find_next_nonempty(
        &mut self,
    ) -> Result<
        Option<(Vec<<L::Page as PageableResponse>::PageItem>, Paginator<L::Page, L::Error>)>,
        E,
    > {
        loop {
            match self.parents.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(e),
                Some(Ok(parent)) => {
                    let mut pages = self.loader.load(parent);
                    loop {
                        match pages.next().await {
                            // This parent has no children at all; skip it.
                            None => break,
                            Some(Err(e)) => return Err(e),
                            Some(Ok(page)) => {
                                let items = page.items();
                                if !items.is_empty() {
                                    return Ok(Some((items, pages)));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

impl<C, E> Stream for FlattenedPaginator<C, E> {
    type Item = Result<Vec<C>, E>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.project().stream.poll_next(cx)
    }
}

/// An adapter that yields the individual items of a flattened traversal.
pub struct FlattenedItems<C, E> {
    pages: FlattenedPaginator<C, E>,
    current: std::vec::IntoIter<C>,
}

impl<C, E> FlattenedItems<C, E>
where
    C: Unpin,
{
    /// Returns the next item of the flattened sequence.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }
}

impl<C, E> Stream for FlattenedItems<C, E>
where
    C: Unpin,
{
    type Item = Result<C, E>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.current.next() {
                return std::task::Poll::Ready(Some(Ok(item)));
            }
            match std::task::ready!(Pin::new(&mut this.pages).poll_next(cx)) {
                None => return std::task::Poll::Ready(None),
                Some(Err(e)) => return std::task::Poll::Ready(Some(Err(e))),
                Some(Ok(page)) => {
                    this.current = page.into_iter();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type TestError = Box<dyn std::error::Error + Send + Sync>;

    struct ChildPage {
        items: Vec<String>,
        next_page_token: String,
    }

    impl PageableResponse for ChildPage {
        type PageItem = String;

        fn items(self) -> Vec<String> {
            self.items
        }

        fn next_page_token(&self) -> String {
            self.next_page_token.clone()
        }
    }

    /// A fake child-listing service: each parent maps to its pages, and
    /// every fetch is recorded so tests can assert on fetch ordering.
    #[derive(Clone, Default)]
    struct FakeService {
        pages: Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>,
        fetch_log: Arc<Mutex<Vec<String>>>,
        fail_on: Arc<Mutex<Option<String>>>,
    }

    impl FakeService {
        fn with_parent(self, parent: &str, pages: &[&[&str]]) -> Self {
            let pages_for_parent = pages
                .iter()
                .map(|page| page.iter().map(|s| s.to_string()).collect())
                .collect();
            self.pages
                .lock()
                .unwrap()
                .insert(parent.to_string(), pages_for_parent);
            self
        }

        fn fail_on(self, fetch: &str) -> Self {
            *self.fail_on.lock().unwrap() = Some(fetch.to_string());
            self
        }

        fn log(&self) -> Vec<String> {
            self.fetch_log.lock().unwrap().clone()
        }

        fn loader(&self) -> impl FnMut(String) -> Paginator<ChildPage, TestError> + Send + 'static
        {
            let service = self.clone();
            move |parent: String| {
                let service = service.clone();
                let execute = move |token: String| {
                    let service = service.clone();
                    let parent = parent.clone();
                    async move {
                        let index = if token.is_empty() {
                            0
                        } else {
                            token.parse::<usize>().unwrap()
                        };
                        let fetch = format!("{parent}#{index}");
                        service.fetch_log.lock().unwrap().push(fetch.clone());
                        if service.fail_on.lock().unwrap().as_deref() == Some(fetch.as_str()) {
                            return Err(TestError::from("simulated fetch failure"));
                        }
                        let pages = service.pages.lock().unwrap();
                        let parent_pages = pages.get(&parent).cloned().unwrap_or_default();
                        let items = parent_pages.get(index).cloned().unwrap_or_default();
                        let next_page_token = if index + 1 < parent_pages.len() {
                            (index + 1).to_string()
                        } else {
                            String::new()
                        };
                        Ok(ChildPage {
                            items,
                            next_page_token,
                        })
                    }
                };
                Paginator::new(String::new(), execute)
            }
        }
    }

    fn parents(
        names: &[&str],
    ) -> impl Stream<Item = Result<String, TestError>> + Unpin + Send + 'static {
        futures::stream::iter(
            names
                .iter()
                .map(|name| Ok(name.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    async fn drain<C, E>(mut flattened: FlattenedPaginator<C, E>) -> Result<Vec<Vec<C>>, E> {
        let mut pages = Vec::new();
        while let Some(page) = flattened.next().await {
            pages.push(page?);
        }
        Ok(pages)
    }

    #[tokio::test]
    async fn skips_empty_parents() {
        let service = FakeService::default()
            .with_parent("a", &[&["a1", "a2"], &["a3"]])
            .with_parent("b", &[&[]])
            .with_parent("c", &[&["c1"]]);
        let flattened =
            FlattenedPaginator::new(parents(&["a", "b", "c"]), service.loader());
        let pages = drain(flattened).await.unwrap();
        // Every page has at least one item, and the items appear in parent
        // order then child order.
        assert!(pages.iter().all(|page| !page.is_empty()));
        let all = pages.into_iter().flatten().collect::<Vec<_>>();
        assert_eq!(all, ["a1", "a2", "a3", "c1"]);
    }

    #[tokio::test]
    async fn item_count_is_preserved() {
        let service = FakeService::default()
            .with_parent("a", &[&["a1"], &[], &["a2", "a3"]])
            .with_parent("b", &[&["b1"]]);
        let flattened = FlattenedPaginator::new(parents(&["a", "b"]), service.loader());
        let pages = drain(flattened).await.unwrap();
        let total = pages.iter().map(Vec::len).sum::<usize>();
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn prefetches_one_parent_ahead() {
        let service = FakeService::default()
            .with_parent("a", &[&["a1"], &["a2"]])
            .with_parent("b", &[&[]])
            .with_parent("c", &[&["c1"]]);
        let mut flattened =
            FlattenedPaginator::new(parents(&["a", "b", "c"]), service.loader());

        let page = flattened.next().await.unwrap().unwrap();
        assert_eq!(page, ["a1"]);
        // Establishing "a" also scanned past the empty "b" and pre-fetched
        // exactly the first page of "c"; nothing further.
        assert_eq!(service.log(), ["a#0", "b#0", "c#0"]);

        let page = flattened.next().await.unwrap().unwrap();
        assert_eq!(page, ["a2"]);
        assert_eq!(service.log(), ["a#0", "b#0", "c#0", "a#1"]);

        // The switch to "c" reuses the pre-fetched page.
        let page = flattened.next().await.unwrap().unwrap();
        assert_eq!(page, ["c1"]);
        assert_eq!(service.log(), ["a#0", "b#0", "c#0", "a#1"]);

        assert!(flattened.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_traversal() {
        let service = FakeService::default()
            .with_parent("a", &[&[]])
            .with_parent("b", &[&[]]);
        let mut flattened = FlattenedPaginator::new(parents(&["a", "b"]), service.loader());
        assert!(flattened.next().await.is_none());
        // A second poll after the end stays terminated.
        assert!(flattened.next().await.is_none());
    }

    #[tokio::test]
    async fn no_parents_at_all() {
        let service = FakeService::default();
        let mut flattened = FlattenedPaginator::new(parents(&[]), service.loader());
        assert!(flattened.next().await.is_none());
    }

    #[tokio::test]
    async fn child_fetch_failure_propagates() {
        let service = FakeService::default()
            .with_parent("a", &[&["a1"], &["a2"]])
            .with_parent("b", &[&["b1"]])
            .fail_on("a#1");
        let mut flattened = FlattenedPaginator::new(parents(&["a", "b"]), service.loader());
        let page = flattened.next().await.unwrap().unwrap();
        assert_eq!(page, ["a1"]);
        let err = flattened.next().await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "simulated fetch failure");
        assert!(flattened.next().await.is_none());
    }

    #[tokio::test]
    async fn parent_fetch_failure_propagates() {
        let service = FakeService::default().with_parent("a", &[&["a1"]]);
        let parent_stream = futures::stream::iter(vec![
            Ok("a".to_string()),
            Err(TestError::from("parent listing failed")),
        ]);
        let mut flattened = FlattenedPaginator::new(parent_stream, service.loader());
        // The failure surfaces on the poll that performs the pre-fetch.
        let err = flattened.next().await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "parent listing failed");
        assert!(flattened.next().await.is_none());
    }

    #[tokio::test]
    async fn items_adapter() {
        let service = FakeService::default()
            .with_parent("a", &[&["a1", "a2"]])
            .with_parent("b", &[&["b1"]]);
        let mut items =
            FlattenedPaginator::new(parents(&["a", "b"]), service.loader()).items();
        let mut all = Vec::new();
        while let Some(item) = items.next().await {
            all.push(item.unwrap());
        }
        assert_eq!(all, ["a1", "a2", "b1"]);
    }
}
