//! Remote proxies against an in-memory transport and a live server.

use async_trait::async_trait;
use mpi_domain::{ActorError, ActorTable, Domain, Mpi, simple_actor};
use mpi_meta::{Meta, forbidden};
use mpi_remote::{
    Envelope, HttpTransport, RemoteActor, RemoteActorConfig, RemoteDomainConfig, RemoteMpi,
    Response, Transport, TransportError, Verb, remote_domain,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Transport that records every request and answers with a fixed body.
#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(String, Verb, Envelope)>>,
    status: u16,
    body: String,
}

impl Recorder {
    fn answering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            status: 200,
            body: body.to_string(),
            ..Self::default()
        })
    }

    fn sent(&self) -> Vec<(String, Verb, Envelope)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(
        &self,
        uri: &str,
        verb: Verb,
        envelope: &Envelope,
    ) -> Result<Response, TransportError> {
        self.sent
            .lock()
            .push((uri.to_string(), verb, envelope.clone()));
        Ok(Response {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// Transport that cannot reach anything.
struct Unreachable;

#[async_trait]
impl Transport for Unreachable {
    async fn send(&self, _: &str, _: Verb, _: &Envelope) -> Result<Response, TransportError> {
        Err(TransportError::Http("connection refused".into()))
    }
}

#[tokio::test]
async fn call_posts_and_ctrl_patches() {
    let recorder = Recorder::answering(r#"{"kind":"User","gid":"u1"}"#);
    let mpi = RemoteMpi::new("http://peer/mpi", recorder.clone());

    let out = mpi
        .call("find", Meta::new("User"), Meta::options().with_attr("deep", true))
        .await;
    assert_eq!(out.gid(), Some("u1"));

    mpi.ctrl("reset", Meta::new("User"), Meta::nil()).await;

    let sent = recorder.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "http://peer/mpi");
    assert_eq!(sent[0].1, Verb::Post);
    assert_eq!(sent[0].2.method, "find");
    assert_eq!(sent[0].2.options.bool_attr("deep"), Some(true));
    assert_eq!(sent[1].1, Verb::Patch);
    assert_eq!(sent[1].2.method, "reset");
}

#[tokio::test]
async fn remote_close_is_local() {
    let recorder = Recorder::answering(r#"{"kind":"Closed"}"#);
    let mpi = RemoteMpi::new("http://peer/mpi", recorder.clone());

    assert!(mpi.ctrl("close", Meta::nil(), Meta::nil()).await.is_nil());
    assert!(recorder.sent().is_empty());

    let ctrl = RemoteActor::ctrl(
        "http://peer/mpi",
        Meta::new("Actor").with_method("close"),
        recorder.clone(),
    );
    let domain = Domain::builder().with_ctrl(ctrl).build();
    assert!(domain.ctrl("close", Meta::nil(), Meta::nil()).await.is_nil());
    assert!(recorder.sent().is_empty());
}

#[tokio::test]
async fn malformed_shapes_become_nil() {
    let mpi = RemoteMpi::new("http://peer", Recorder::answering(r#"{"kind": 7}"#));
    let out = mpi.try_call("find", Meta::new("User"), Meta::nil()).await;
    assert!(out.is_ok_and(|m| m.is_nil()));
}

#[tokio::test]
async fn unparseable_bodies_are_errors() {
    let mpi = RemoteMpi::new("http://peer", Recorder::answering("<html>oops</html>"));
    let err = mpi
        .try_call("find", Meta::new("User"), Meta::nil())
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));

    let out = mpi.call("find", Meta::new("User"), Meta::nil()).await;
    assert!(out.is_error());
    assert_eq!(out.attr("code"), Some("502"));
}

#[tokio::test]
async fn transport_failures_surface_through_local_dispatch() {
    let actor = RemoteActor::new(
        "http://peer",
        Meta::new("Actor").with_method("find").with_tag("target", "User"),
        Arc::new(Unreachable),
    );
    let domain = Domain::builder().with_actor(actor).build();

    let out = domain.call("find", Meta::new("User"), Meta::nil()).await;
    assert_eq!(out.attr("code"), Some("502"));
    assert!(out.attr_or("message", "").starts_with("[User.find] "));
}

#[tokio::test]
async fn remote_domains_honour_uri_overrides() {
    let config = RemoteDomainConfig::from_json(
        r#"{
            "uri": "http://root",
            "actors": [
                { "meta": { "kind": "Actor", "method": "find", "tags": { "target": "User" } } },
                { "uri": "http://orders",
                  "meta": { "kind": "Actor", "method": "find", "tags": { "target": "Order" } } }
            ],
            "ctrls": [
                { "meta": { "kind": "Actor", "method": "stats" } }
            ],
            "subs": [
                { "actors": [
                    { "meta": { "kind": "Actor", "method": "list", "tags": { "target": "Item" } } }
                  ] },
                { "uri": "http://shop",
                  "meta": { "kind": "Domain", "ns": "shop" },
                  "actors": [
                    { "meta": { "kind": "Actor", "method": "make", "tags": { "target": "Item" } } }
                  ] }
            ]
        }"#,
    )
    .unwrap();

    let recorder = Recorder::answering(r#"{"kind":"Ok"}"#);
    let domain = remote_domain(&config, "http://default", recorder.clone());
    assert_eq!(domain.uri(), "http://root");
    assert!(domain.sub("shop").is_some_and(|d| d.uri() == "http://shop"));

    domain.find(Meta::new("User"), Meta::nil()).await;
    domain.find(Meta::new("Order"), Meta::nil()).await;
    domain.list(Meta::new("Item"), Meta::nil()).await;
    domain.make(Meta::new("Item"), Meta::nil()).await;
    domain.ctrl("stats", Meta::nil(), Meta::nil()).await;

    let uris: Vec<_> = recorder
        .sent()
        .into_iter()
        .map(|(uri, verb, env)| (uri, verb, env.method))
        .collect();
    assert_eq!(
        uris,
        [
            ("http://root".to_string(), Verb::Post, "find".to_string()),
            ("http://orders".to_string(), Verb::Post, "find".to_string()),
            ("http://root".to_string(), Verb::Post, "list".to_string()),
            ("http://shop".to_string(), Verb::Post, "make".to_string()),
            ("http://root".to_string(), Verb::Patch, "stats".to_string()),
        ]
    );
}

fn shop() -> Domain {
    let users = ActorTable::new("User")
        .on("find", |m: Meta, _| async move { Ok(m.with_attr("name", "ann")) })
        .on("delete", |_, _| async {
            Err::<Meta, _>(ActorError::from(forbidden("no access")))
        })
        .into_actors();
    Domain::builder()
        .with_actors(users)
        .with_ctrl(simple_actor("User", "count", |_, _| async {
            Ok(Meta::new("Count").with_attr("n", 1))
        }))
        .build()
}

#[tokio::test]
async fn served_domain_matches_local_domain() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}/", listener.local_addr().unwrap());
    tokio::spawn(mpi_remote::server::serve_on(listener, Arc::new(shop())));

    let config = RemoteDomainConfig {
        actors: shop()
            .actors()
            .iter()
            .map(|a| RemoteActorConfig {
                uri: None,
                meta: a.meta().clone(),
            })
            .collect(),
        ctrls: shop()
            .ctrls()
            .iter()
            .map(|a| RemoteActorConfig {
                uri: None,
                meta: a.meta().clone(),
            })
            .collect(),
        ..RemoteDomainConfig::default()
    };
    let remote = remote_domain(&config, &uri, Arc::new(HttpTransport::new()));
    let local = shop();

    let user = Meta::new("User").with_gid("u1");
    for (method, meta) in [
        ("find", user.clone()),
        ("delete", user.clone()),
        ("find", Meta::new("Order")),
    ] {
        let want = local.call(method, meta.clone(), Meta::nil()).await;
        let got = remote.call(method, meta, Meta::nil()).await;
        assert_eq!(got, want, "{method}");
    }

    let want = local.ctrl("count", user.clone(), Meta::nil()).await;
    let got = remote.ctrl("count", user.clone(), Meta::nil()).await;
    assert_eq!(got, want);

    let direct = RemoteMpi::new(uri, Arc::new(HttpTransport::new()));
    let missing = direct.call("find", Meta::new("Order"), Meta::nil()).await;
    assert_eq!(missing.attr("code"), Some("404"));
}
