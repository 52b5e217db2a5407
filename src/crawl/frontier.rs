// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: which URLs are still to be fetched, in what order, and
// which ones have already been dispatched.
//
// How it works:
// 1. Seed URLs go into a FIFO queue
// 2. pop() hands out the oldest queued URL that has not been visited yet
// 3. The driver marks it visited *before* fetching, so it is never retried
// 4. New links are enqueued only if they are neither visited nor queued
// 5. pop() reports "empty" once the visited count hits the page ceiling
//
// Rust concepts:
// - HashSet: To track visited and queued URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Url: Implements Hash + Eq, so canonical URLs are the dedup key directly
// =============================================================================

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Default page ceiling for a single run.
pub const DEFAULT_MAX_PAGES: usize = 500;

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<Url>,
    // Mirror of `queue` for membership checks
    queued: HashSet<Url>,
    visited: HashSet<Url>,
    max_pages: usize,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            max_pages,
        }
    }

    // Creates a frontier pre-loaded with seed URLs, in the order given.
    // Duplicate seeds collapse to one entry.
    pub fn with_seeds<I>(seeds: I, max_pages: usize) -> Self
    where
        I: IntoIterator<Item = Url>,
    {
        let mut frontier = Self::new(max_pages);
        for seed in seeds {
            frontier.enqueue(seed);
        }
        frontier
    }

    // Adds a URL to the back of the queue.
    //
    // Returns: true if the URL was added, false if it was already visited
    // or is already waiting in the queue
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    // Removes and returns the earliest-enqueued URL that has not been visited.
    //
    // Returns None when the queue is exhausted or the page ceiling has been
    // reached, whichever comes first.
    pub fn pop(&mut self) -> Option<Url> {
        if self.ceiling_reached() {
            return None;
        }
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if !self.visited.contains(&url) {
                return Some(url);
            }
        }
        None
    }

    /// Records that `url` has been dispatched to the renderer.
    pub fn mark_visited(&mut self, url: &Url) {
        self.queued.remove(url);
        self.visited.insert(url.clone());
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn ceiling_reached(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why keep both `queue` and `queued`?
//    - VecDeque gives us FIFO order but checking membership is O(n)
//    - The HashSet answers "is this already waiting?" in O(1)
//    - Both are updated together in enqueue() and pop()
//
// 2. Why does pop() still check `visited`?
//    - mark_visited() can be called for a URL that is also queued
//      (for example a seed that shows up again later)
//    - Skipping it on the way out keeps the at-most-once guarantee
//
// 3. Breadth-first vs depth-first:
//    - push_back() + pop_front() = breadth-first
//    - Pages close to the seeds are fetched first, which keeps a runaway
//      link graph from dragging the crawl arbitrarily deep
// -----------------------------------------------------------------------------
