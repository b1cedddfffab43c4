//! Full traversal of the API surface
//!
//! A single sequential pass: every identifier the database yields turns
//! into exactly one comparison per associated endpoint. There is no
//! checkpointing; an interrupted run starts over.

use tracing::info;

use crate::client::RequestParams;
use crate::config::HarnessConfig;
use crate::db::{format_chapter_id, Enumerator};
use crate::error::HarnessResult;
use crate::harness::{Comparator, RunSummary};

/// Walk the whole hierarchy and compare every derived resource path
pub async fn run_regression(config: &HarnessConfig) -> HarnessResult<RunSummary> {
    let enumerator = Enumerator::connect(&config.database_url).await?;
    let mut comparator = Comparator::new(config);
    let no_params = RequestParams::default();

    comparator
        .compare_paginated("/v1/collections", &no_params)
        .await?;

    for collection in enumerator.list_collections().await? {
        info!(%collection, "comparing collection");

        comparator
            .compare(&format!("/v1/collections/{collection}"), &no_params)
            .await?;
        comparator
            .compare_paginated(&format!("/v1/collections/{collection}/books"), &no_params)
            .await?;

        for book in enumerator.list_books(&collection).await? {
            comparator
                .compare(
                    &format!("/v1/collections/{collection}/books/{book}"),
                    &no_params,
                )
                .await?;
            comparator
                .compare_paginated(
                    &format!("/v1/collections/{collection}/books/{book}/hadiths"),
                    &no_params,
                )
                .await?;

            for chapter in enumerator.list_chapters(&collection, &book).await? {
                let chapter_id = format_chapter_id(chapter);
                comparator
                    .compare(
                        &format!(
                            "/v1/collections/{collection}/books/{book}/chapters/{chapter_id}"
                        ),
                        &no_params,
                    )
                    .await?;
            }

            comparator
                .compare_paginated(
                    &format!("/v1/collections/{collection}/books/{book}/chapters"),
                    &no_params,
                )
                .await?;
        }

        for number in enumerator.list_hadith_numbers(&collection).await? {
            comparator
                .compare(
                    &format!("/v1/collections/{collection}/hadiths/{number}"),
                    &no_params,
                )
                .await?;
        }
    }

    for urn in enumerator.list_urns().await? {
        comparator
            .compare(&format!("/v1/hadiths/{urn}"), &no_params)
            .await?;
    }

    if config.include_random {
        // Each side picks its own random hadith, so any diff here is
        // expected; the outcome is advisory and never counted.
        comparator
            .compare_advisory("/v1/hadiths/random", &no_params)
            .await?;
    }

    comparator.print_summary();
    Ok(comparator.summary())
}
