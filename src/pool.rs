//! Bounded concurrency that preserves input order.
//!
//! [`ordered_concurrent`] keeps at most `limit` jobs in flight. Each job is
//! tagged with its position in the input; finished results wait in a
//! reorder buffer until every earlier result has been released, so the
//! output order always equals the input order.

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::stream::{self, BoxStream, FuturesUnordered, Stream, StreamExt};

use crate::error::Result;

struct Pool<'a, T, R, F> {
    input: BoxStream<'a, Result<T>>,
    input_done: bool,
    work: F,
    limit: usize,
    in_flight: FuturesUnordered<BoxFuture<'a, (usize, Result<R>)>>,
    ready: BTreeMap<usize, Result<R>>,
    next_in: usize,
    next_out: usize,
}

/// Run `work` over every item of `input`, at most `limit` at a time.
///
/// Results are yielded in input order. An error from the input stream is
/// yielded in its own position, after which no further input is pulled.
pub fn ordered_concurrent<'a, T, R, F, Fut>(
    input: BoxStream<'a, Result<T>>,
    limit: usize,
    work: F,
) -> impl Stream<Item = Result<R>> + 'a
where
    T: Send + 'a,
    R: Send + 'a,
    F: FnMut(T) -> Fut + Send + 'a,
    Fut: Future<Output = Result<R>> + Send + 'a,
{
    let pool = Pool {
        input,
        input_done: false,
        work,
        limit: limit.max(1),
        in_flight: FuturesUnordered::new(),
        ready: BTreeMap::new(),
        next_in: 0,
        next_out: 0,
    };

    stream::unfold(pool, |mut pool| async move {
        loop {
            if let Some(result) = pool.ready.remove(&pool.next_out) {
                pool.next_out += 1;
                return Some((result, pool));
            }

            // Finished but unreleased results count against the limit too.
            let held = pool.in_flight.len() + pool.ready.len();
            let can_pull = !pool.input_done && held < pool.limit;
            if !can_pull && pool.in_flight.is_empty() {
                return None;
            }

            tokio::select! {
                next = pool.input.next(), if can_pull => {
                    let index = pool.next_in;
                    match next {
                        Some(Ok(item)) => {
                            pool.next_in += 1;
                            let job = (pool.work)(item);
                            pool.in_flight.push(Box::pin(async move { (index, job.await) }));
                        }
                        Some(Err(e)) => {
                            pool.next_in += 1;
                            pool.ready.insert(index, Err(e));
                            pool.input_done = true;
                        }
                        None => pool.input_done = true,
                    }
                }
                Some((index, result)) = pool.in_flight.next(), if !pool.in_flight.is_empty() => {
                    pool.ready.insert(index, result);
                }
            }
        }
    })
}
