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

//! Adapters to consume paginated list operations as async streams.

use futures::stream::unfold;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;

/// A list response that can be iterated over with a [Paginator].
///
/// List operations return one page of results plus a continuation token.
/// An empty token indicates the last page.
pub trait PageableResponse {
    /// The type of the elements in the page.
    type PageItem: Send;

    /// Consumes the response, returning the items in this page.
    fn items(self) -> Vec<Self::PageItem>;

    /// The continuation token. Empty means this is the last page.
    fn next_page_token(&self) -> String;
}

type ControlFlow = std::ops::ControlFlow<(), String>;

/// An adapter that converts a paginated list operation into a
/// [futures::Stream] of pages.
///
/// The paginator is cold: no request is issued until the stream is polled.
/// After a fetch fails the error is reported once and the stream ends;
/// retries belong to the transport collaborator, not to this layer.
#[pin_project]
pub struct Paginator<T, E> {
    #[pin]
    stream: Pin<Box<dyn Stream<Item = Result<T, E>> + Send>>,
}

impl<T, E> Paginator<T, E>
where
    T: PageableResponse + Send + 'static,
    E: Send + 'static,
{
    /// Creates a new [Paginator] given the initial page token and a
    /// function to fetch the next page.
    pub fn new<F, Fut>(seed_token: String, execute: F) -> Self
    where
        F: Fn(String) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        let stream = unfold(ControlFlow::Continue(seed_token), move |state| {
            let execute = execute.clone();
            async move {
                let token = match state {
                    ControlFlow::Continue(token) => token,
                    ControlFlow::Break(_) => return None,
                };
                match execute(token).await {
                    Ok(page) => {
                        let tok = page.next_page_token();
                        let next_state = if tok.is_empty() {
                            ControlFlow::Break(())
                        } else {
                            ControlFlow::Continue(tok)
                        };
                        Some((Ok(page), next_state))
                    }
                    Err(e) => Some((Err(e), ControlFlow::Break(()))),
                }
            }
        });
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Returns the next page of the wrapped stream.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }

    /// Converts this paginator into one yielding individual items rather
    /// than pages.
    pub fn items(self) -> ItemPaginator<T, E>
    where
        T::PageItem: Unpin,
    {
        ItemPaginator::new(self)
    }
}

impl<T, E> Stream for Paginator<T, E> {
    type Item = Result<T, E>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.project().stream.poll_next(cx)
    }
}

/// An adapter that yields the individual items of a paginated list
/// operation, fetching new pages as needed.
pub struct ItemPaginator<T, E>
where
    T: PageableResponse,
{
    pages: Paginator<T, E>,
    current: std::vec::IntoIter<T::PageItem>,
}

impl<T, E> ItemPaginator<T, E>
where
    T: PageableResponse,
    T::PageItem: Unpin,
{
    fn new(pages: Paginator<T, E>) -> Self {
        Self {
            pages,
            current: Vec::new().into_iter(),
        }
    }

    /// Returns the next item of the wrapped stream.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }
}

impl<T, E> Stream for ItemPaginator<T, E>
where
    T: PageableResponse,
    T::PageItem: Unpin,
{
    type Item = Result<T::PageItem, E>;

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
                    this.current = page.items().into_iter();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct TestResponse {
        items: Vec<PageItem>,
        next_page_token: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct PageItem {
        name: String,
    }

    impl PageableResponse for TestResponse {
        type PageItem = PageItem;

        fn items(self) -> Vec<PageItem> {
            self.items
        }

        fn next_page_token(&self) -> String {
            self.next_page_token.clone()
        }
    }

    fn test_response(names: &[&str], token: &str) -> TestResponse {
        TestResponse {
            items: names
                .iter()
                .map(|name| PageItem {
                    name: name.to_string(),
                })
                .collect(),
            next_page_token: token.to_string(),
        }
    }

    type TestError = Box<dyn std::error::Error + Send + Sync>;

    #[tokio::test]
    async fn paginator_pages() {
        let responses = VecDeque::from([
            test_response(&["item1", "item2"], "token2"),
            test_response(&["item3"], ""),
        ]);
        let expected_tokens = VecDeque::from(["token1".to_string(), "token2".to_string()]);

        let state = Arc::new(Mutex::new(responses));
        let tokens = Arc::new(Mutex::new(expected_tokens));

        let execute = move |token: String| {
            let expected = tokens.lock().unwrap().pop_front().unwrap();
            assert_eq!(token, expected);
            let response = state.lock().unwrap().pop_front().unwrap();
            async move { Ok::<_, TestError>(response) }
        };

        let mut pages = Vec::new();
        let mut paginator = Paginator::new("token1".to_string(), execute);
        while let Some(page) = paginator.next().await {
            pages.push(page.unwrap());
        }
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].next_page_token, "token2");
        assert_eq!(pages[1].next_page_token, "");
    }

    #[tokio::test]
    async fn paginator_items() {
        let responses = VecDeque::from([
            test_response(&["item1", "item2"], "token2"),
            test_response(&[], "token3"),
            test_response(&["item3"], ""),
        ]);
        let state = Arc::new(Mutex::new(responses));
        let execute = move |_: String| {
            let response = state.lock().unwrap().pop_front().unwrap();
            async move { Ok::<_, TestError>(response) }
        };

        let mut names = Vec::new();
        let mut items = Paginator::new(String::new(), execute).items();
        while let Some(item) = items.next().await {
            names.push(item.unwrap().name);
        }
        assert_eq!(names, ["item1", "item2", "item3"]);
    }

    #[tokio::test]
    async fn paginator_error() {
        let execute = |_| async { Err::<TestResponse, TestError>("err".into()) };

        let mut paginator = Paginator::new(String::new(), execute);
        let mut count = 0;
        while let Some(page) = paginator.next().await {
            match page {
                Ok(_) => panic!("should not succeed"),
                Err(e) => {
                    assert_eq!(e.to_string(), "err");
                    count += 1;
                }
            }
        }
        assert_eq!(count, 1);
    }
}
