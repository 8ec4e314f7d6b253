//! Constructors for every collaborator, called by the builder in dependency
//! order. Each parameter struct carries only handles that already exist when
//! the corresponding stage runs.

use std::sync::Arc;

use dagnode_types::{Network, SubnetworkId};

use crate::adapters::{DnsSeeder, InMemoryAddressBook, SubnetworkFilter};
use crate::container::NodeConfig;
use crate::lifecycle::ShutdownRequester;

use super::{
    AcceptanceIndex, AddressBook, BlockDag, BlockTemplateGenerator, ConnectionManager,
    IndexManager, Mempool, ProtocolEventSink, ProtocolManager, RpcServer, SeedSource, SigCache,
    TimeSource, Transport,
};

/// Inputs of the DAG engine.
pub struct DagParams {
    pub network: Network,
    pub time_source: Arc<dyn TimeSource>,
    pub subnetwork_id: SubnetworkId,
    pub max_utxo_cache_size: u64,
    pub sig_cache: Arc<dyn SigCache>,
    pub index_manager: Option<Arc<dyn IndexManager>>,
}

/// Mempool admission policy limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MempoolPolicy {
    pub accept_non_std: bool,
    pub max_orphan_txs: usize,
    pub max_orphan_tx_size: usize,
    /// Minimum relay fee in sompi per kilobyte.
    pub min_relay_tx_fee: u64,
    pub max_tx_version: u16,
}

/// Inputs of the mempool. The DAG provides sequence locks and UTXO lookups.
pub struct MempoolParams {
    pub dag: Arc<dyn BlockDag>,
    pub sig_cache: Arc<dyn SigCache>,
    pub policy: MempoolPolicy,
}

/// Inputs of the protocol manager.
pub struct ProtocolParams {
    pub dag: Arc<dyn BlockDag>,
    pub transport: Arc<dyn Transport>,
    pub address_book: Arc<dyn AddressBook>,
    pub mempool: Arc<dyn Mempool>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub events: Arc<dyn ProtocolEventSink>,
}

/// Block template policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningPolicy {
    pub block_max_mass: u64,
}

/// Inputs of the block template generator.
pub struct TemplateParams {
    pub policy: MiningPolicy,
    pub mempool: Arc<dyn Mempool>,
    pub dag: Arc<dyn BlockDag>,
    pub sig_cache: Arc<dyn SigCache>,
}

/// Inputs of the RPC server.
pub struct RpcParams {
    pub transport: Arc<dyn Transport>,
    pub dag: Arc<dyn BlockDag>,
    pub protocol_manager: Arc<dyn ProtocolManager>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub block_template_generator: Arc<dyn BlockTemplateGenerator>,
    pub mempool: Arc<dyn Mempool>,
    pub address_book: Arc<dyn AddressBook>,
    pub acceptance_index: Option<Arc<dyn AcceptanceIndex>>,
    /// Lets RPC clients ask the node to shut down.
    pub shutdown: ShutdownRequester,
}

/// Builds the node's collaborators.
///
/// Constructors must not open sockets or spawn tasks: a failed build is
/// discarded without teardown.
pub trait ComponentFactory: Send + Sync {
    fn acceptance_index(&self) -> anyhow::Result<Arc<dyn AcceptanceIndex>>;

    fn index_manager(
        &self,
        acceptance_index: Arc<dyn AcceptanceIndex>,
    ) -> anyhow::Result<Arc<dyn IndexManager>>;

    fn sig_cache(&self, max_size: usize) -> Arc<dyn SigCache>;

    fn dag(&self, params: DagParams) -> anyhow::Result<Arc<dyn BlockDag>>;

    fn mempool(&self, params: MempoolParams) -> anyhow::Result<Arc<dyn Mempool>>;

    fn transport(&self, config: &NodeConfig) -> anyhow::Result<Arc<dyn Transport>>;

    /// Defaults to an in-memory book.
    fn address_book(&self, _config: &NodeConfig) -> anyhow::Result<Arc<dyn AddressBook>> {
        Ok(Arc::new(InMemoryAddressBook::new()))
    }

    fn connection_manager(
        &self,
        config: &NodeConfig,
        transport: Arc<dyn Transport>,
        address_book: Arc<dyn AddressBook>,
    ) -> anyhow::Result<Arc<dyn ConnectionManager>>;

    fn protocol_manager(
        &self,
        config: &NodeConfig,
        params: ProtocolParams,
    ) -> anyhow::Result<Arc<dyn ProtocolManager>>;

    fn block_template_generator(&self, params: TemplateParams) -> Arc<dyn BlockTemplateGenerator>;

    fn rpc_server(&self, config: &NodeConfig, params: RpcParams)
        -> anyhow::Result<Arc<dyn RpcServer>>;

    /// Defaults to resolving `host` through the system resolver, asking for
    /// peers on `subnetwork_id`.
    fn dns_seed_source(
        &self,
        host: &str,
        default_port: u16,
        subnetwork_id: SubnetworkId,
    ) -> Arc<dyn SeedSource> {
        Arc::new(
            DnsSeeder::new(host, default_port)
                .with_subnetwork_filter(SubnetworkFilter::from(subnetwork_id)),
        )
    }

    fn grpc_seed_source(&self, endpoint: &str) -> anyhow::Result<Arc<dyn SeedSource>>;
}
