//! # Test Fakes
//!
//! Recording implementations of every collaborator port. A shared event log
//! captures construction and lifecycle calls in the order they happen so
//! tests can assert on ordering.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use dagnode_runtime::adapters::InMemoryAddressBook;
use dagnode_runtime::container::NodeConfig;
use dagnode_runtime::ports::*;
use dagnode_runtime::{
    shutdown_channel, BuildStage, NodeBuilder, NodeError, NodeGraph, ShutdownListener,
};
use dagnode_types::{
    BlockHash, DagNotification, NetAddress, PeerId, ServiceFlags, SubnetworkId, TransactionId,
};

// =============================================================================
// EVENT LOG
// =============================================================================

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.lock().iter().any(|e| e == event)
    }

    /// Index of the first occurrence of `event`.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e == event)
    }
}

// =============================================================================
// NETWORKING
// =============================================================================

pub struct FakeTransport {
    log: EventLog,
    id: PeerId,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
}

impl FakeTransport {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            id: PeerId::from_bytes([7; 16]),
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn start(&self) -> anyhow::Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.log.push("transport.start");
        if self.fail_start.load(Ordering::SeqCst) {
            anyhow::bail!("address already in use");
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.log.push("transport.stop");
        if self.fail_stop.load(Ordering::SeqCst) {
            anyhow::bail!("listener already closed");
        }
        Ok(())
    }

    fn id(&self) -> PeerId {
        self.id
    }
}

pub struct FakeConnectionManager {
    log: EventLog,
    pub fail_stop: AtomicBool,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
}

#[async_trait]
impl ConnectionManager for FakeConnectionManager {
    async fn start(&self) {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push("connection_manager.start");
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.log.push("connection_manager.stop");
        if self.fail_stop.load(Ordering::SeqCst) {
            anyhow::bail!("dialer stuck");
        }
        Ok(())
    }
}

// =============================================================================
// CONSENSUS
// =============================================================================

#[derive(Default)]
pub struct FakeDag {
    subscribers: Mutex<Vec<NotificationCallback>>,
}

impl FakeDag {
    /// Deliver a notification to every subscriber, serially.
    pub fn publish(&self, notification: &DagNotification) {
        for subscriber in self.subscribers.lock().iter() {
            subscriber(notification);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl BlockDag for FakeDag {
    fn subscribe(&self, callback: NotificationCallback) {
        self.subscribers.lock().push(callback);
    }
}

pub struct FakeIndex;

impl AcceptanceIndex for FakeIndex {}
impl IndexManager for FakeIndex {}

pub struct FakeSigCache(usize);

impl SigCache for FakeSigCache {
    fn capacity(&self) -> usize {
        self.0
    }
}

pub struct FakeMempool;

impl Mempool for FakeMempool {
    fn count(&self) -> usize {
        0
    }
}

pub struct FakeProtocolManager;

impl ProtocolManager for FakeProtocolManager {}

pub struct FakeTemplateGenerator;

impl BlockTemplateGenerator for FakeTemplateGenerator {}

// =============================================================================
// RPC
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcCall {
    BlockAdded(BlockHash),
    TransactionsAdded(Vec<TransactionId>),
    ChainChanged {
        removed: Vec<BlockHash>,
        added: Vec<BlockHash>,
    },
    FinalityConflict(String),
    FinalityConflictResolved(String),
}

#[derive(Default)]
pub struct FakeRpc {
    calls: Mutex<Vec<RpcCall>>,
    pub fail_forwarding: AtomicBool,
}

impl FakeRpc {
    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: RpcCall) -> anyhow::Result<()> {
        if self.fail_forwarding.load(Ordering::SeqCst) {
            anyhow::bail!("notification channel closed");
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl RpcServer for FakeRpc {
    fn notify_block_added_to_dag(&self, block_hash: &BlockHash) {
        self.calls.lock().push(RpcCall::BlockAdded(*block_hash));
    }

    fn notify_transactions_added_to_mempool(&self, transaction_ids: &[TransactionId]) {
        self.calls
            .lock()
            .push(RpcCall::TransactionsAdded(transaction_ids.to_vec()));
    }

    fn notify_chain_changed(
        &self,
        removed_chain_block_hashes: &[BlockHash],
        added_chain_block_hashes: &[BlockHash],
    ) -> anyhow::Result<()> {
        self.record(RpcCall::ChainChanged {
            removed: removed_chain_block_hashes.to_vec(),
            added: added_chain_block_hashes.to_vec(),
        })
    }

    fn notify_finality_conflict(&self, violating_block_hash: &str) -> anyhow::Result<()> {
        self.record(RpcCall::FinalityConflict(violating_block_hash.to_string()))
    }

    fn notify_finality_conflict_resolved(&self, finality_block_hash: &str) -> anyhow::Result<()> {
        self.record(RpcCall::FinalityConflictResolved(
            finality_block_hash.to_string(),
        ))
    }
}

// =============================================================================
// SEEDING
// =============================================================================

pub struct FakeSeedSource {
    kind: &'static str,
    target: String,
    result: Result<Vec<NetAddress>, String>,
    delay: Duration,
}

#[async_trait]
impl SeedSource for FakeSeedSource {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn target(&self) -> &str {
        &self.target
    }

    async fn fetch(&self, required: ServiceFlags) -> anyhow::Result<Vec<NetAddress>> {
        assert_eq!(required, ServiceFlags::NODE_NETWORK);
        tokio::time::sleep(self.delay).await;
        self.result.clone().map_err(anyhow::Error::msg)
    }
}

pub fn seed_address(last: u8) -> NetAddress {
    NetAddress::new(
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, last)),
        16111,
        ServiceFlags::NODE_NETWORK,
    )
}

// =============================================================================
// FATAL
// =============================================================================

/// Panics instead of exiting so tests can observe fatal faults.
pub struct PanicOnFatal;

impl FatalHandler for PanicOnFatal {
    fn terminate(&self, error: &NodeError) -> ! {
        panic!("fatal: {error}");
    }
}

// =============================================================================
// FACTORY
// =============================================================================

pub struct FakeFactory {
    pub log: EventLog,
    pub fail_stage: Option<BuildStage>,
    pub transport: Arc<FakeTransport>,
    pub connection_manager: Arc<FakeConnectionManager>,
    pub dag: Arc<FakeDag>,
    pub rpc: Arc<FakeRpc>,
    /// Addresses every seed source returns.
    pub seed_addresses: Vec<NetAddress>,
    /// Seed lookups fail with this message when set.
    pub seed_error: Option<String>,
    pub seed_delay: Duration,
    pub protocol_events: Mutex<Option<Arc<dyn ProtocolEventSink>>>,
    pub mempool_policy: Mutex<Option<MempoolPolicy>>,
    pub dag_had_index_manager: AtomicBool,
    pub rpc_had_acceptance_index: AtomicBool,
    /// Subnetwork passed to each DNS seed source.
    pub dns_subnetworks: Mutex<Vec<SubnetworkId>>,
}

impl Default for FakeFactory {
    fn default() -> Self {
        let log = EventLog::default();
        Self {
            transport: Arc::new(FakeTransport::new(log.clone())),
            connection_manager: Arc::new(FakeConnectionManager {
                log: log.clone(),
                fail_stop: AtomicBool::new(false),
                start_calls: AtomicUsize::new(0),
                stop_calls: AtomicUsize::new(0),
            }),
            log,
            fail_stage: None,
            dag: Arc::new(FakeDag::default()),
            rpc: Arc::new(FakeRpc::default()),
            seed_addresses: Vec::new(),
            seed_error: None,
            seed_delay: Duration::ZERO,
            protocol_events: Mutex::new(None),
            mempool_policy: Mutex::new(None),
            dag_had_index_manager: AtomicBool::new(false),
            rpc_had_acceptance_index: AtomicBool::new(false),
            dns_subnetworks: Mutex::new(Vec::new()),
        }
    }
}

impl FakeFactory {
    pub fn failing_at(stage: BuildStage) -> Self {
        Self {
            fail_stage: Some(stage),
            ..Self::default()
        }
    }

    fn step(&self, stage: BuildStage, event: &str) -> anyhow::Result<()> {
        if self.fail_stage == Some(stage) {
            anyhow::bail!("injected {event} failure");
        }
        self.log.push(event);
        Ok(())
    }

    fn seed_source(&self, kind: &'static str, target: &str) -> FakeSeedSource {
        FakeSeedSource {
            kind,
            target: target.to_string(),
            result: match &self.seed_error {
                Some(message) => Err(message.clone()),
                None => Ok(self.seed_addresses.clone()),
            },
            delay: self.seed_delay,
        }
    }
}

impl ComponentFactory for FakeFactory {
    fn acceptance_index(&self) -> anyhow::Result<Arc<dyn AcceptanceIndex>> {
        self.step(BuildStage::AcceptanceIndex, "acceptance_index")?;
        Ok(Arc::new(FakeIndex))
    }

    fn index_manager(
        &self,
        _acceptance_index: Arc<dyn AcceptanceIndex>,
    ) -> anyhow::Result<Arc<dyn IndexManager>> {
        self.step(BuildStage::IndexManager, "index_manager")?;
        Ok(Arc::new(FakeIndex))
    }

    fn sig_cache(&self, max_size: usize) -> Arc<dyn SigCache> {
        self.log.push("sig_cache");
        Arc::new(FakeSigCache(max_size))
    }

    fn dag(&self, params: DagParams) -> anyhow::Result<Arc<dyn BlockDag>> {
        self.step(BuildStage::Dag, "dag")?;
        self.dag_had_index_manager
            .store(params.index_manager.is_some(), Ordering::SeqCst);
        Ok(self.dag.clone())
    }

    fn mempool(&self, params: MempoolParams) -> anyhow::Result<Arc<dyn Mempool>> {
        self.step(BuildStage::Mempool, "mempool")?;
        *self.mempool_policy.lock() = Some(params.policy);
        Ok(Arc::new(FakeMempool))
    }

    fn transport(&self, _config: &NodeConfig) -> anyhow::Result<Arc<dyn Transport>> {
        self.step(BuildStage::Transport, "transport")?;
        Ok(self.transport.clone())
    }

    fn address_book(&self, _config: &NodeConfig) -> anyhow::Result<Arc<dyn AddressBook>> {
        self.step(BuildStage::AddressBook, "address_book")?;
        Ok(Arc::new(InMemoryAddressBook::new()))
    }

    fn connection_manager(
        &self,
        _config: &NodeConfig,
        _transport: Arc<dyn Transport>,
        _address_book: Arc<dyn AddressBook>,
    ) -> anyhow::Result<Arc<dyn ConnectionManager>> {
        self.step(BuildStage::ConnectionManager, "connection_manager")?;
        Ok(self.connection_manager.clone())
    }

    fn protocol_manager(
        &self,
        _config: &NodeConfig,
        params: ProtocolParams,
    ) -> anyhow::Result<Arc<dyn ProtocolManager>> {
        self.step(BuildStage::ProtocolManager, "protocol_manager")?;
        *self.protocol_events.lock() = Some(params.events);
        Ok(Arc::new(FakeProtocolManager))
    }

    fn block_template_generator(&self, _params: TemplateParams) -> Arc<dyn BlockTemplateGenerator> {
        self.log.push("block_template_generator");
        Arc::new(FakeTemplateGenerator)
    }

    fn rpc_server(
        &self,
        _config: &NodeConfig,
        params: RpcParams,
    ) -> anyhow::Result<Arc<dyn RpcServer>> {
        self.step(BuildStage::RpcServer, "rpc_server")?;
        self.rpc_had_acceptance_index
            .store(params.acceptance_index.is_some(), Ordering::SeqCst);
        Ok(self.rpc.clone())
    }

    fn dns_seed_source(
        &self,
        host: &str,
        _default_port: u16,
        subnetwork_id: SubnetworkId,
    ) -> Arc<dyn SeedSource> {
        self.log.push(format!("dns_seed:{host}"));
        self.dns_subnetworks.lock().push(subnetwork_id);
        Arc::new(self.seed_source("dns", host))
    }

    fn grpc_seed_source(&self, endpoint: &str) -> anyhow::Result<Arc<dyn SeedSource>> {
        self.step(BuildStage::SeedSources, &format!("grpc_seed:{endpoint}"))?;
        Ok(Arc::new(self.seed_source("grpc", endpoint)))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Config with DNS seeding pointed at a single fake host.
pub fn test_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.network.dns_seed = Some("seed.test".to_string());
    config
}

/// Build a graph with a panicking fatal handler.
pub fn build_node(
    config: NodeConfig,
    factory: Arc<FakeFactory>,
) -> (Result<NodeGraph, NodeError>, ShutdownListener) {
    let (requester, listener) = shutdown_channel();
    let graph = NodeBuilder::new(config, factory, requester)
        .with_fatal_handler(Arc::new(PanicOnFatal))
        .build();
    (graph, listener)
}
