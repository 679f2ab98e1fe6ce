use std::sync::Arc;
use std::time::Duration;

use scout_api::{AclResolver, InProcApi, MockApi, SearchApi};
use scout_core::{
    Acl, Capability, Context, FuzzySearchRequest, Job, Node, QueryOptions, Resource, SearchConfig, SearchError,
    SearchRequest, SearchResponse,
};
use scout_store::{Mutation, StateStore};

fn job(id: &str) -> Resource {
    Resource::Job(Job { id: id.into(), namespace: "default".into(), name: id.into(), status: "running".into() })
}

fn node(id: &str) -> Resource {
    Resource::Node(Node {
        id: id.into(),
        name: "client-1".into(),
        datacenter: "dc1".into(),
        node_class: String::new(),
        status: "ready".into(),
    })
}

fn store_with(rows: Vec<Resource>) -> Arc<StateStore> {
    let store = Arc::new(StateStore::new());
    store.restore(1, rows).unwrap();
    store
}

#[tokio::test]
async fn prefix_search_answers_from_current_snapshot() {
    let api = InProcApi::new(store_with(vec![job("web-1"), job("web-2"), job("api")]));
    let resp = api.prefix_search(SearchRequest::new("web", Context::Jobs)).await.unwrap();
    assert_eq!(resp.get(&Context::Jobs).unwrap(), &["web-1".to_string(), "web-2".to_string()]);
    assert_eq!(resp.meta.index, 1);
    assert!(resp.meta.known_leader);
}

#[tokio::test]
async fn blocking_query_waits_for_the_queried_collection() {
    let store = store_with(vec![job("web-1")]);
    let api = InProcApi::new(Arc::clone(&store));

    let writer = tokio::spawn({
        let store = Arc::clone(&store);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            // Other collections moving does not satisfy a jobs query.
            store.apply(2, vec![Mutation::Upsert(node("e3671fa4-21ff-4c2f-9b9e-000000000001"))]).unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            store.apply(3, vec![Mutation::Upsert(job("web-2"))]).unwrap();
        }
    });

    let opts = QueryOptions {
        min_query_index: 1,
        max_query_time: Some(Duration::from_secs(5)),
        ..QueryOptions::default()
    };
    let resp = api.prefix_search(SearchRequest::new("web", Context::Jobs).with_options(opts)).await.unwrap();
    assert_eq!(resp.meta.index, 3);
    assert_eq!(resp.get(&Context::Jobs).unwrap().len(), 2);
    writer.await.unwrap();
}

#[tokio::test]
async fn blocking_query_returns_stale_result_on_timeout() {
    let api = InProcApi::new(store_with(vec![job("web-1")]));
    let opts = QueryOptions {
        min_query_index: 10,
        max_query_time: Some(Duration::from_millis(30)),
        ..QueryOptions::default()
    };
    let started = std::time::Instant::now();
    let resp = api.prefix_search(SearchRequest::new("web", Context::Jobs).with_options(opts)).await.unwrap();
    assert_eq!(resp.meta.index, 1);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn fuzzy_search_can_be_disabled() {
    let store = store_with(vec![job("web-1")]);
    let api = InProcApi::new(Arc::clone(&store));
    let resp = api.fuzzy_search(FuzzySearchRequest::new("web", Context::All)).await.unwrap();
    assert_eq!(resp.get(&Context::Jobs).unwrap(), &["web-1".to_string()]);

    let off = SearchConfig { fuzzy_enabled: false, ..SearchConfig::default() };
    let api = InProcApi::new(store).with_config(off);
    let err = api.fuzzy_search(FuzzySearchRequest::new("web", Context::All)).await.unwrap_err();
    assert_eq!(err, SearchError::FuzzyDisabled);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn config_limits_reach_the_ranker() {
    let store = store_with((0..10).map(|i| job(&format!("web-{i}"))).collect());
    let cfg = SearchConfig { limit_results: 3, ..SearchConfig::default() };
    let api = InProcApi::new(store).with_config(cfg);
    let resp = api.fuzzy_search(FuzzySearchRequest::new("web", Context::Jobs)).await.unwrap();
    assert_eq!(resp.get(&Context::Jobs).unwrap().len(), 3);
    assert!(resp.is_truncated(&Context::Jobs));
}

#[tokio::test]
async fn tokens_gate_requests() {
    let tokens = AclResolver::enabled()
        .with_token("ops", Acl::management())
        .with_token("dev", Acl::default().with_namespace("dev", &[Capability::ReadJob]));
    let api = InProcApi::new(store_with(vec![job("web-1")])).with_tokens(Arc::new(tokens));

    let with_token = |secret: &str, ns: &str| QueryOptions {
        auth_token: secret.into(),
        namespace: ns.into(),
        ..QueryOptions::default()
    };

    let err = api
        .prefix_search(SearchRequest::new("web", Context::Jobs).with_options(with_token("bogus", "")))
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::TokenNotFound);

    let err = api
        .prefix_search(SearchRequest::new("web", Context::Jobs).with_options(with_token("", "")))
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::PermissionDenied);

    let err = api
        .prefix_search(SearchRequest::new("web", Context::Jobs).with_options(with_token("dev", "")))
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::PermissionDenied);

    let resp = api
        .prefix_search(SearchRequest::new("web", Context::Jobs).with_options(with_token("dev", "dev")))
        .await
        .unwrap();
    assert!(resp.get(&Context::Jobs).unwrap().is_empty());

    let resp = api
        .prefix_search(SearchRequest::new("web", Context::Jobs).with_options(with_token("ops", "")))
        .await
        .unwrap();
    assert_eq!(resp.get(&Context::Jobs).unwrap(), &["web-1".to_string()]);
}

#[tokio::test]
async fn mock_returns_canned_responses() {
    let mut canned = SearchResponse::default();
    canned.insert(Context::Jobs, vec!["web-1".into()], false);
    let api = MockApi { prefix: Some(canned.clone()), fuzzy: None };

    let resp = api.prefix_search(SearchRequest::new("anything", Context::All)).await.unwrap();
    assert_eq!(resp, canned);
    assert_eq!(
        api.fuzzy_search(FuzzySearchRequest::new("web", Context::All)).await.unwrap_err(),
        SearchError::FuzzyDisabled
    );
}
