//! Overlapping `fetch` calls from several threads must always settle.

use std::sync::{Arc, Barrier};
use std::thread;

use async_trait::async_trait;
use cityweather_core::{
    ErrorKind, FetchHandle, WeatherClient, WeatherCoordinator, WeatherError, WeatherReport,
};

/// Fails immediately so results race with the next call's transition.
#[derive(Debug)]
struct OfflineClient;

#[async_trait]
impl WeatherClient for OfflineClient {
    async fn fetch_current(
        &self,
        _city: &str,
        _api_key: &str,
    ) -> Result<WeatherReport, WeatherError> {
        Err(WeatherError::Transport("offline".into()))
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

/// Set each city and fetch from its own thread, all released together.
fn fetch_from_threads(
    runtime: &tokio::runtime::Runtime,
    coordinator: &WeatherCoordinator,
    cities: &[&'static str],
) -> Vec<FetchHandle> {
    let barrier = Arc::new(Barrier::new(cities.len()));

    let threads: Vec<_> = cities
        .iter()
        .map(|city| {
            let coordinator = coordinator.clone();
            let barrier = Arc::clone(&barrier);
            let handle = runtime.handle().clone();
            let city = *city;
            thread::spawn(move || {
                let _guard = handle.enter();
                barrier.wait();
                coordinator.set_city(city);
                coordinator.fetch()
            })
        })
        .collect();

    threads.into_iter().map(|t| t.join().unwrap()).collect()
}

#[test]
fn test_threaded_fetches_never_end_in_loading() {
    let runtime = runtime();

    for i in 0..5_000 {
        let coordinator = WeatherCoordinator::new(Arc::new(OfflineClient), "KEY");
        let handles = fetch_from_threads(&runtime, &coordinator, &["London", "London"]);

        runtime.block_on(async {
            for handle in handles {
                handle.finished().await;
            }
        });

        let state = coordinator.state();
        assert!(!state.is_loading(), "iteration {i} stuck in Loading");
        assert_eq!(
            state.error().map(WeatherError::kind),
            Some(ErrorKind::Transport)
        );
    }
}

#[test]
fn test_threaded_blank_and_real_fetches_settle() {
    let runtime = runtime();

    for i in 0..5_000 {
        let coordinator = WeatherCoordinator::new(Arc::new(OfflineClient), "KEY");
        let handles = fetch_from_threads(&runtime, &coordinator, &["London", "  "]);

        runtime.block_on(async {
            for handle in handles {
                handle.finished().await;
            }
        });

        let state = coordinator.state();
        assert!(state.is_settled(), "iteration {i} not settled: {state:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fetch_tasks_settle() {
    for _ in 0..500 {
        let coordinator = WeatherCoordinator::new(Arc::new(OfflineClient), "KEY");
        coordinator.set_city("London");

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.fetch().finished().await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let state = coordinator.state();
        assert!(!state.is_loading());
        assert!(state.has_error());
    }
}
