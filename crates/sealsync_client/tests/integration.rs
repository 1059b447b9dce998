//! Integration tests for the secure channel and the record server.

use sealsync_client::{
    ChannelConfig, ChannelError, HttpClient, LocalState, LoopbackClient, LoopbackServer,
    Reconciler, SecureChannel, UreqClient, Validity,
};
use sealsync_protocol::{
    ErrorBody, HttpRequest, HttpResponse, Method, Record, AUTHORIZATION_HEADER, SIGNATURE_HEADER,
};
use sealsync_server::{ServerConfig, SyncServer};
use sealsync_storage::{FileBackend, InMemoryBackend, StateBackend};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Routes loopback requests to an in-process server, counting them.
struct CountingServer {
    server: SyncServer,
    calls: AtomicUsize,
}

impl CountingServer {
    fn new(server: SyncServer) -> Arc<Self> {
        Arc::new(Self {
            server,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LoopbackServer for CountingServer {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.server.handle(request)
    }
}

type Channel = SecureChannel<LoopbackClient<Arc<CountingServer>>>;

fn config() -> ChannelConfig {
    ChannelConfig::new("http://localhost:3000/")
}

fn hello_server() -> Arc<CountingServer> {
    CountingServer::new(SyncServer::new(ServerConfig::default()))
}

fn connect(server: &Arc<CountingServer>, state: LocalState) -> (Channel, Record) {
    let established = SecureChannel::establish(
        config(),
        LoopbackClient::new(Arc::clone(server)),
        state,
    )
    .unwrap();
    (established.channel, established.record)
}

fn fresh_state() -> LocalState {
    LocalState::new(InMemoryBackend::new())
}

#[test]
fn hello_world_on_fresh_install() {
    let server = hello_server();
    let (channel, record) = connect(&server, fresh_state());

    assert_eq!(record, Record::new("Hello World!"));
    assert_eq!(channel.local_record().unwrap(), Some(record));
    assert!(channel.verify().unwrap());
}

#[test]
fn send_then_fetch_round_trip() {
    let server = hello_server();
    let (channel, _) = connect(&server, fresh_state());

    let record = Record::new("A");
    assert_eq!(channel.send(&record).unwrap(), record);
    assert_eq!(channel.fetch().unwrap(), record);
    assert_eq!(server.server.record(), record);
    assert!(channel.verify().unwrap());
}

#[test]
fn fetch_detects_foreign_write() {
    let server = hello_server();
    let (channel, _) = connect(&server, fresh_state());
    channel.send(&Record::new("A")).unwrap();

    server.server.replace_record(Record::new("B"));

    assert!(matches!(channel.fetch(), Err(ChannelError::InvalidSignature)));
    assert!(matches!(channel.verify(), Err(ChannelError::DataMismatch)));
    // local state is not rewritten by the failed checks
    assert_eq!(channel.local_record().unwrap(), Some(Record::new("A")));
}

#[test]
fn mismatch_and_recovery() {
    let server = hello_server();
    let (first, _) = connect(&server, fresh_state());
    let mut reconciler: Reconciler<_, Record> = Reconciler::new(
        SecureChannel::establish(config(), LoopbackClient::new(Arc::clone(&server)), fresh_state())
            .unwrap(),
    );
    let mut validity = reconciler.validity().subscribe();

    reconciler.update(Record::new("A")).unwrap();
    assert!(reconciler.check().unwrap());

    // another client overwrites the record
    first.send(&Record::new("B")).unwrap();

    let err = reconciler.check().unwrap_err();
    assert!(matches!(err, ChannelError::DataMismatch));
    assert!(reconciler.validity().is_invalid());
    assert_eq!(
        reconciler.validity().last_known_record(),
        Some(Record::new("A"))
    );
    assert!(validity.has_changed().unwrap());
    assert_eq!(
        *validity.borrow_and_update(),
        Validity::Invalid {
            last_known: Record::new("A")
        }
    );

    let restored = reconciler.restore().unwrap().cloned();
    assert_eq!(restored, Some(Record::new("A")));
    assert!(!reconciler.validity().is_invalid());
    assert_eq!(server.server.record(), Record::new("A"));
    assert!(reconciler.check().unwrap());
}

#[test]
fn recover_with_foreign_record_accepts_it() {
    let server = hello_server();
    let (other, _) = connect(&server, fresh_state());
    let mut reconciler: Reconciler<_, Record> = Reconciler::new(
        SecureChannel::establish(config(), LoopbackClient::new(Arc::clone(&server)), fresh_state())
            .unwrap(),
    );

    reconciler.update(Record::new("A")).unwrap();
    other.send(&Record::new("B")).unwrap();

    assert!(matches!(reconciler.check(), Err(ChannelError::DataMismatch)));
    assert_eq!(
        reconciler.validity().last_known_record(),
        Some(Record::new("A"))
    );

    let recovered = reconciler.recover(Record::new("B")).unwrap().clone();
    assert_eq!(recovered, Record::new("B"));
    assert_eq!(reconciler.record(), &Record::new("B"));
    assert!(!reconciler.validity().is_invalid());
    assert!(reconciler.check().unwrap());
    assert_eq!(server.server.record(), Record::new("B"));
}

#[test]
fn verify_is_false_iff_records_differ() {
    let server = hello_server();
    let (channel, _) = connect(&server, fresh_state());

    for data in ["A", "B", "", "with \"quotes\" and ünïcödé"] {
        channel.send(&Record::new(data)).unwrap();
        assert!(channel.verify().unwrap());

        server.server.replace_record(Record::new(format!("{data}!")));
        assert!(matches!(channel.verify(), Err(ChannelError::DataMismatch)));
    }
}

#[test]
fn basic_authorization_is_rejected() {
    let server = hello_server();
    let client = LoopbackClient::new(Arc::clone(&server));

    let response = client
        .execute(
            HttpRequest::new(Method::Get, "http://localhost:3000/")
                .with_header(AUTHORIZATION_HEADER, "Basic xyz"),
        )
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(response.header(SIGNATURE_HEADER).is_none());
    let body: ErrorBody = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body.message, "Invalid authorization header");
}

#[test]
fn closed_channel_makes_no_network_calls() {
    let server = hello_server();
    let (channel, _) = connect(&server, fresh_state());
    let calls = server.calls();

    channel.close();
    assert!(matches!(channel.fetch(), Err(ChannelError::ChannelClosed)));
    assert!(matches!(
        channel.send(&Record::new("A")),
        Err(ChannelError::ChannelClosed)
    ));
    assert!(matches!(channel.verify(), Err(ChannelError::ChannelClosed)));
    assert_eq!(server.calls(), calls);
}

#[test]
fn reset_generates_new_key_and_refetches() {
    let server = hello_server();
    let backend = Arc::new(InMemoryBackend::new());
    let (channel, _) = connect(&server, LocalState::new(Arc::clone(&backend)));
    channel.send(&Record::new("A")).unwrap();
    let old_key = backend.get("secret-key").unwrap().unwrap();
    let old_signature = channel.signer().sign(&Record::new("A")).unwrap();

    let established = channel.reset().unwrap();

    let new_key = backend.get("secret-key").unwrap().unwrap();
    assert_ne!(old_key, new_key);
    assert_eq!(established.record, Record::new("A"));
    assert!(established.channel.is_open());
    assert!(established.channel.verify().unwrap());

    // signatures made under the old key no longer verify
    let signer = established.channel.signer();
    assert!(!signer.verify(&Record::new("A"), &old_signature).unwrap());
    let new_signature = signer.sign(&Record::new("A")).unwrap();
    assert_ne!(new_signature, old_signature);
    assert!(signer.verify(&Record::new("A"), &new_signature).unwrap());
}

#[test]
fn reset_after_foreign_write_adopts_server_record() {
    let server = hello_server();
    let (channel, _) = connect(&server, fresh_state());
    channel.send(&Record::new("A")).unwrap();
    server.server.replace_record(Record::new("B"));
    assert!(channel.fetch().is_err());

    let established = channel.reset().unwrap();
    assert_eq!(established.record, Record::new("B"));
}

#[test]
fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let server = hello_server();

    {
        let state = LocalState::new(FileBackend::open(dir.path()).unwrap());
        let (channel, _) = connect(&server, state);
        channel.send(&Record::new("persisted")).unwrap();
    }

    let key_before = FileBackend::open(dir.path())
        .unwrap()
        .get("secret-key")
        .unwrap();

    let state = LocalState::new(FileBackend::open(dir.path()).unwrap());
    let (channel, record) = connect(&server, state);
    assert_eq!(record, Record::new("persisted"));
    assert!(channel.verify().unwrap());

    let key_after = FileBackend::open(dir.path())
        .unwrap()
        .get("secret-key")
        .unwrap();
    assert_eq!(key_before, key_after);
}

#[test]
fn stale_install_cannot_establish() {
    let dir = tempfile::tempdir().unwrap();
    let server = hello_server();

    {
        let state = LocalState::new(FileBackend::open(dir.path()).unwrap());
        let (channel, _) = connect(&server, state);
        channel.send(&Record::new("mine")).unwrap();
    }
    server.server.replace_record(Record::new("theirs"));

    let state = LocalState::new(FileBackend::open(dir.path()).unwrap());
    let err = SecureChannel::<_, Record>::establish(
        config(),
        LoopbackClient::new(Arc::clone(&server)),
        state,
    )
    .unwrap_err();
    assert!(matches!(err, ChannelError::EstablishFailed(_)));
    assert!(err.is_integrity_violation());
}

#[test]
fn seeded_establishment() {
    let server = CountingServer::new(SyncServer::new(
        ServerConfig::default().with_initial_record(Record::new("seed")),
    ));

    let established = SecureChannel::establish_with(
        config(),
        LoopbackClient::new(Arc::clone(&server)),
        fresh_state(),
        &Record::new("seed"),
    )
    .unwrap();
    assert_eq!(established.record, Record::new("seed"));

    let err = SecureChannel::establish_with(
        config(),
        LoopbackClient::new(Arc::clone(&server)),
        fresh_state(),
        &Record::new("not the seed"),
    )
    .unwrap_err();
    assert!(matches!(err.cause(), ChannelError::InvalidSignature));
}

#[test]
fn over_tcp_with_ureq() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = SyncServer::new(ServerConfig::default());
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    runtime.spawn({
        let server = server.clone();
        async move { server.serve(listener).await }
    });

    let config = ChannelConfig::new(format!("http://{addr}/")).with_timeout(Duration::from_secs(5));
    let established =
        SecureChannel::<_, Record>::establish(config.clone(), UreqClient::new(&config), fresh_state())
            .unwrap();
    assert_eq!(established.record, Record::new("Hello World!"));

    let channel = established.channel;
    assert_eq!(channel.send(&Record::new("over the wire")).unwrap().data, "over the wire");
    assert_eq!(server.record(), Record::new("over the wire"));
    assert!(channel.verify().unwrap());

    let rejected = UreqClient::new(&config)
        .execute(HttpRequest::new(Method::Get, config.server_url.clone()))
        .unwrap();
    assert_eq!(rejected.status, 401);
    assert!(rejected.header(SIGNATURE_HEADER).is_none());
}
