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

//! The machine image catalog.
//!
//! Images are organized by publisher, then offer, then sku. Each level is
//! its own paginated listing, so enumerating "every image in a location"
//! is a nested traversal. [Images::list_all] flattens it into one lazy
//! sequence using [FlattenedPaginator], fetching pages only as they are
//! consumed.

use crate::model::*;
use crate::stub;
use mgx::error::Error;
use mgx::flatten::FlattenedPaginator;
use mgx::options::RequestOptions;
use mgx::paginator::Paginator;
use std::sync::Arc;

/// The image catalog of one location.
pub struct Images {
    stub: Arc<dyn stub::Compute>,
    location: String,
}

impl Images {
    pub(crate) fn new(stub: Arc<dyn stub::Compute>, location: String) -> Self {
        Self { stub, location }
    }

    /// Lists the image publishers, one page at a time.
    pub fn publishers(&self) -> Paginator<ListPublishersResponse, Error> {
        let stub = self.stub.clone();
        let location = self.location.clone();
        Paginator::new(String::new(), move |page_token| {
            let stub = stub.clone();
            let location = location.clone();
            async move {
                stub.list_publishers(
                    location,
                    page_token,
                    RequestOptions::new().set_idempotent(true),
                )
                .await
                .map(|r| r.into_body())
            }
        })
    }

    /// Lists the offers of one publisher, one page at a time.
    pub fn offers<P: Into<String>>(&self, publisher: P) -> Paginator<ListOffersResponse, Error> {
        offers(self.stub.clone(), self.location.clone(), publisher.into())
    }

    /// Lists the skus of one offer, one page at a time.
    pub fn skus<P, O>(&self, publisher: P, offer: O) -> Paginator<ListSkusResponse, Error>
    where
        P: Into<String>,
        O: Into<String>,
    {
        skus(
            self.stub.clone(),
            self.location.clone(),
            publisher.into(),
            offer.into(),
        )
    }

    /// Lists the images of one sku, one page at a time.
    pub fn images(&self, sku: &Sku) -> Paginator<ListImagesResponse, Error> {
        images(self.stub.clone(), self.location.clone(), sku.clone())
    }

    /// Lists every image of every publisher, offer, and sku in this
    /// location, as one flat lazy sequence.
    ///
    /// Publishers with no offers, offers with no skus, and skus with no
    /// images contribute nothing; they do not surface as empty pages. The
    /// traversal is in catalog order: publishers as listed, then their
    /// offers, then skus, then images.
    ///
    /// # Example
    /// ```no_run
    /// # use compute_mgmt::client::Compute;
    /// # async fn example(client: &Compute) -> mgx::Result<()> {
    /// let mut images = client.images("location-1").list_all().items();
    /// while let Some(image) = images.next().await.transpose()? {
    ///     println!("{}:{}:{}:{}", image.publisher, image.offer, image.sku, image.name);
    /// }
    /// # Ok(()) }
    /// ```
    pub fn list_all(&self) -> FlattenedPaginator<Image, Error> {
        let location = self.location.clone();

        let stub = self.stub.clone();
        let by_publisher = {
            let location = location.clone();
            move |publisher: Publisher| offers(stub.clone(), location.clone(), publisher.name)
        };
        let all_offers = FlattenedPaginator::new(self.publishers().items(), by_publisher).items();

        let stub = self.stub.clone();
        let by_offer = {
            let location = location.clone();
            move |offer: Offer| skus(stub.clone(), location.clone(), offer.publisher, offer.name)
        };
        let all_skus = FlattenedPaginator::new(all_offers, by_offer).items();

        let stub = self.stub.clone();
        let by_sku = move |sku: Sku| images(stub.clone(), location.clone(), sku);
        FlattenedPaginator::new(all_skus, by_sku)
    }
}

fn offers(
    stub: Arc<dyn stub::Compute>,
    location: String,
    publisher: String,
) -> Paginator<ListOffersResponse, Error> {
    Paginator::new(String::new(), move |page_token| {
        let stub = stub.clone();
        let location = location.clone();
        let publisher = publisher.clone();
        async move {
            stub.list_offers(
                location,
                publisher,
                page_token,
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
        }
    })
}

fn skus(
    stub: Arc<dyn stub::Compute>,
    location: String,
    publisher: String,
    offer: String,
) -> Paginator<ListSkusResponse, Error> {
    Paginator::new(String::new(), move |page_token| {
        let stub = stub.clone();
        let location = location.clone();
        let publisher = publisher.clone();
        let offer = offer.clone();
        async move {
            stub.list_skus(
                location,
                publisher,
                offer,
                page_token,
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
        }
    })
}

fn images(
    stub: Arc<dyn stub::Compute>,
    location: String,
    sku: Sku,
) -> Paginator<ListImagesResponse, Error> {
    Paginator::new(String::new(), move |page_token| {
        let stub = stub.clone();
        let location = location.clone();
        let sku = sku.clone();
        async move {
            stub.list_sku_images(
                location,
                sku.publisher,
                sku.offer,
                sku.name,
                page_token,
                RequestOptions::new().set_idempotent(true),
            )
            .await
            .map(|r| r.into_body())
        }
    })
}
