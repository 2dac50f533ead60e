// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch regeneration — rebuilds every stored card from its own portrait
// slot on a bounded rayon pool.
//
// Results come back in listing order and one failed card does not stop the
// others.

use cardwerk_core::error::{CardwerkError, Result};
use cardwerk_core::types::CardFields;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, instrument, warn};

use crate::card::{CardComposer, ComposedCard};
use crate::store::{CardStore, StoredCard};

/// Build a pool with `workers` threads, or rayon's default when `None`.
pub fn worker_pool(workers: Option<usize>) -> Result<ThreadPool> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("cardwerk-worker-{i}"));
    if let Some(n) = workers {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|err| CardwerkError::WorkerPool(err.to_string()))
}

/// Apply `job` to every item on `pool`, keeping input order in the output.
pub fn fan_out<T, R, F>(pool: &ThreadPool, items: &[T], job: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    pool.install(|| items.par_iter().map(&job).collect())
}

/// Regenerate one stored card in place.
pub fn regenerate_card(
    store: &CardStore,
    composer: &CardComposer,
    card: &StoredCard,
) -> Result<ComposedCard> {
    let portrait = store.portrait(card, composer.template())?;
    let fields = card.record.fields();
    composer.compose_forced(portrait, &CardFields::new(fields.name, fields.phone, fields.post))
}

/// Regenerate every card in `store` with `composer`.
///
/// The outer error is a pool or listing failure; each inner result belongs
/// to the card at the same position in [`CardStore::list`].
#[instrument(skip(store, composer))]
pub fn regenerate_all(
    store: &CardStore,
    composer: &CardComposer,
    workers: Option<usize>,
) -> Result<Vec<Result<ComposedCard>>> {
    let cards = store.list()?;
    let pool = worker_pool(workers)?;
    info!(cards = cards.len(), threads = pool.current_num_threads(), "Regenerating cards");

    let results = fan_out(&pool, &cards, |card| {
        let result = regenerate_card(store, composer, card);
        if let Err(err) = &result {
            warn!(serial = card.serial, error = %err, "Card regeneration failed");
        }
        result
    });

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(total = results.len(), failed, "Regeneration finished");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::composer::tests::{composer, system_font};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fan_out_keeps_input_order() {
        let pool = worker_pool(Some(4)).unwrap();
        let items: Vec<u64> = (0..200).collect();
        let out = fan_out(&pool, &items, |n| {
            // Uneven work so completion order differs from input order.
            std::thread::sleep(std::time::Duration::from_micros((200 - n) * 10));
            n * 2
        });
        assert_eq!(out, items.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn pool_respects_worker_count() {
        let pool = worker_pool(Some(2)).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
        let calls = AtomicUsize::new(0);
        fan_out(&pool, &[1, 2, 3], |_| calls.fetch_add(1, Ordering::SeqCst));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn regenerate_all_rebuilds_each_card_and_reports_failures() {
        let Some(font) = system_font() else { return };
        let dir = tempfile::tempdir().unwrap();
        let composer = composer(font, dir.path());

        for name in ["asha rao", "ravi kumar"] {
            composer
                .compose_forced(
                    image::DynamicImage::new_rgb8(90, 60),
                    &CardFields::new(name, "9876543210", "clerk"),
                )
                .unwrap();
        }
        // A recognised name whose image cannot be decoded.
        std::fs::write(dir.path().join("ID_Card_Zed_Ray_1111122222_Driver.png"), b"junk").unwrap();

        let store = CardStore::open(dir.path()).unwrap();
        let results = regenerate_all(&store, &composer, Some(2)).unwrap();
        assert_eq!(results.len(), 3);

        let names: Vec<Option<String>> = results
            .iter()
            .map(|r| r.as_ref().ok().map(|c| c.record.name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![Some("Asha Rao".to_owned()), Some("Ravi Kumar".to_owned()), None]
        );
    }
}
