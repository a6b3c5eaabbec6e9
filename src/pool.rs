//! Token pool
//!
//! A mutex-guarded free list of [`OwnedToken`]s for callers that detach
//! one token at a time (typically a start element handed to a nested
//! unmarshaler) and then drop it.

use crate::core::token::{OwnedToken, Token};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Free-list entries kept at most; extra releases are dropped
const MAX_POOLED: usize = 256;

/// Reusable set of detached tokens, safe to share between threads
#[derive(Debug, Default)]
pub struct TokenPool {
    free: Mutex<Vec<OwnedToken>>,
}

impl TokenPool {
    pub const fn new() -> Self {
        TokenPool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide pool
    pub fn global() -> &'static TokenPool {
        static GLOBAL: TokenPool = TokenPool::new();
        &GLOBAL
    }

    /// Take a cleared token, recycled when one is available
    pub fn acquire(&self) -> OwnedToken {
        self.lock().pop().unwrap_or_default()
    }

    /// Take a token holding a deep copy of `token`
    pub fn acquire_copy(&self, token: &Token<'_>) -> OwnedToken {
        let mut owned = self.acquire();
        owned.copy_from(token);
        owned
    }

    /// Return a token to the pool. Its contents are cleared; capacity is kept.
    pub fn release(&self, mut token: OwnedToken) {
        token.clear();
        let mut free = self.lock();
        if free.len() < MAX_POOLED {
            free.push(token);
        }
    }

    /// Number of tokens waiting to be reused
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OwnedToken>> {
        // The list is never left half-updated, poisoning is harmless
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tokenizer;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_acquire_release_recycles() {
        let pool = TokenPool::new();
        assert!(pool.is_empty());

        let token = pool.acquire();
        assert!(token.is_empty());
        pool.release(token);
        assert_eq!(pool.len(), 1);

        let _token = pool.acquire();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_acquire_copy_detaches_from_tokenizer() {
        let pool = TokenPool::new();
        let mut tok = Tokenizer::new(&b"<a x=\"1\">hi</a><b/>"[..]);

        let first = pool.acquire_copy(&tok.next_token().unwrap());
        let second = tok.next_token().unwrap();
        assert!(second.is_end_element());

        assert_eq!(first.name().full, b"a");
        assert_eq!(first.attrs().find(b"x").unwrap().value, b"1");
        assert_eq!(first.data(), b"hi");
        pool.release(first);
    }

    #[test]
    fn test_released_tokens_are_cleared() {
        let pool = TokenPool::new();
        let mut tok = Tokenizer::new(&b"<a>text</a>"[..]);
        let owned = pool.acquire_copy(&tok.next_token().unwrap());
        pool.release(owned);

        let reused = pool.acquire();
        assert!(reused.is_empty());
        assert!(reused.name().is_empty());
        assert!(reused.data().is_empty());
    }

    #[test]
    fn test_free_list_is_capped() {
        let pool = TokenPool::new();
        for _ in 0..MAX_POOLED + 10 {
            pool.release(OwnedToken::new());
        }
        assert_eq!(pool.len(), MAX_POOLED);
    }

    #[test]
    fn test_concurrent_use() {
        let pool = Arc::new(TokenPool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut tok = Tokenizer::new(&b"<item id=\"7\"/>"[..]);
                        let owned = pool.acquire_copy(&tok.next_token().unwrap());
                        assert_eq!(owned.name().full, b"item");
                        pool.release(owned);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.len() <= 4);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(TokenPool::global(), TokenPool::global()));
    }
}
