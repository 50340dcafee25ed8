use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::*;

fn verdict(ingredient: &str, fdc_id: u64, score: f64) -> SemanticVerdict {
    SemanticVerdict {
        ingredient: ingredient.to_string(),
        fdc_id,
        score,
        reasoning: "test".to_string(),
    }
}

#[tokio::test]
async fn second_lookup_reuses_cached_verdict() {
    let cache = RunCache::new();
    let key = ("tzatziki".to_string(), 100u64);
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let got: Result<_, Arc<std::convert::Infallible>> = cache
            .verdict_or_try_insert_with(key.clone(), async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(verdict("tzatziki", 100, 95.0))
            })
            .await;
        assert_eq!(got.unwrap().score, 95.0);
    }

    // Exactly one init ran; the second lookup was a pure read.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_readers_collapse_to_one_init() {
    let cache = RunCache::new();
    let calls = Arc::new(AtomicU32::new(0));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                let got: Result<_, Arc<std::convert::Infallible>> = cache
                    .verdict_or_try_insert_with(("salt".to_string(), 7), async move {
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(verdict("salt", 7, 88.0))
                    })
                    .await;
                got.unwrap().score
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), 88.0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_init_is_not_cached() {
    let cache = RunCache::new();
    let key = ("basil".to_string(), 42u64);

    let failed: Result<SemanticVerdict, Arc<String>> = cache
        .verdict_or_try_insert_with(key.clone(), async { Err("oracle down".to_string()) })
        .await;
    assert!(failed.is_err());
    assert!(cache.peek_verdict(&key).await.is_none());

    let recovered: Result<_, Arc<String>> = cache
        .verdict_or_try_insert_with(key.clone(), async { Ok(verdict("basil", 42, 70.0)) })
        .await;
    assert_eq!(recovered.unwrap().score, 70.0);
}

#[tokio::test]
async fn query_cache_keys_on_attempt_index() {
    let cache = RunCache::new();

    let q1: Result<_, Arc<std::convert::Infallible>> = cache
        .query_or_try_insert_with(("onion".to_string(), 1), async {
            Ok("onions raw".to_string())
        })
        .await;
    let q2: Result<_, Arc<std::convert::Infallible>> = cache
        .query_or_try_insert_with(("onion".to_string(), 2), async {
            Ok("onion fresh".to_string())
        })
        .await;

    assert_eq!(q1.unwrap(), "onions raw");
    assert_eq!(q2.unwrap(), "onion fresh");
    assert_eq!(
        cache.peek_query(&("onion".to_string(), 1)).await.as_deref(),
        Some("onions raw")
    );
}

#[tokio::test]
async fn profile_cache_keys_on_ingredient() {
    let cache = RunCache::new();
    let calls = Arc::new(AtomicU32::new(0));

    let mut expected = crate::nutrition::NutrientProfile::new();
    expected.insert(crate::nutrition::Nutrient::Calories, 61.0, "kcal");

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let expected = expected.clone();
        let got: Result<_, Arc<std::convert::Infallible>> = cache
            .profile_or_try_insert_with("whole milk".to_string(), async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(expected)
            })
            .await;
        assert_eq!(got.unwrap().len(), 1);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.peek_profile(&"whole milk".to_string()).await.is_some());
}
