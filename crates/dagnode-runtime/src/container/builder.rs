//! # Dependency Builder
//!
//! Builds every collaborator in dependency order and wires the event paths
//! between them.
//!
//! ## Build Order
//!
//! ```text
//! 1. Acceptance index + index manager   (only if enabled)
//! 2. Signature cache
//! 3. DAG                                 (time source, sig cache, index manager)
//! 4. Mempool                             (DAG, sig cache)
//! 5. Net adapter, address manager, connection manager
//! 6. Protocol manager                    (DAG, transport, book, mempool, conn mgr)
//! 7. Block template generator, RPC server
//! 8. Seed sources
//! 9. Protocol relay bound to RPC, notification bridge subscribed to DAG
//! ```
//!
//! Wiring runs last, so a build that fails at any stage leaves no DAG
//! subscription behind. Nothing is started or spawned here.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::adapters::{ProcessExit, SystemTimeSource};
use crate::container::config::{NodeConfig, DEFAULT_MAX_ORPHAN_TX_SIZE, MAX_TX_VERSION};
use crate::error::{BuildResultExt, BuildStage, NodeError};
use crate::lifecycle::ShutdownRequester;
use crate::ports::{
    AcceptanceIndex, AddressBook, BlockDag, BlockTemplateGenerator, ComponentFactory,
    ConnectionManager, DagParams, FatalHandler, IndexManager, Mempool, MempoolParams,
    MempoolPolicy, MiningPolicy, ProtocolManager, ProtocolParams, RpcParams, RpcServer,
    SeedSource, SigCache, TemplateParams, TimeSource, Transport,
};
use crate::seeding::SeedCoordinator;
use crate::wiring::{NotificationBridge, ProtocolEventRelay};

/// Every collaborator of a running node. Fully wired once returned by
/// [`NodeBuilder::build`].
pub struct NodeGraph {
    pub config: NodeConfig,

    // Consensus
    pub acceptance_index: Option<Arc<dyn AcceptanceIndex>>,
    pub index_manager: Option<Arc<dyn IndexManager>>,
    pub sig_cache: Arc<dyn SigCache>,
    pub dag: Arc<dyn BlockDag>,
    pub mempool: Arc<dyn Mempool>,

    // Networking
    pub transport: Arc<dyn Transport>,
    pub address_book: Arc<dyn AddressBook>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub protocol_manager: Arc<dyn ProtocolManager>,

    // RPC
    pub block_template_generator: Arc<dyn BlockTemplateGenerator>,
    pub rpc_server: Arc<dyn RpcServer>,

    pub seed_coordinator: SeedCoordinator,
    pub fatal: Arc<dyn FatalHandler>,
}

/// One-shot builder for a [`NodeGraph`].
pub struct NodeBuilder {
    config: NodeConfig,
    factory: Arc<dyn ComponentFactory>,
    shutdown: ShutdownRequester,
    time_source: Arc<dyn TimeSource>,
    fatal: Arc<dyn FatalHandler>,
}

impl NodeBuilder {
    /// `shutdown` is handed to the RPC server so clients can stop the node.
    pub fn new(
        config: NodeConfig,
        factory: Arc<dyn ComponentFactory>,
        shutdown: ShutdownRequester,
    ) -> Self {
        Self {
            config,
            factory,
            shutdown,
            time_source: Arc::new(SystemTimeSource),
            fatal: Arc::new(ProcessExit),
        }
    }

    /// Replace the DAG's clock.
    #[must_use]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Replace the handler invoked on unrecoverable errors.
    #[must_use]
    pub fn with_fatal_handler(mut self, fatal: Arc<dyn FatalHandler>) -> Self {
        self.fatal = fatal;
        self
    }

    /// Build the node graph.
    #[instrument(skip_all, fields(network = %self.config.network.network))]
    pub fn build(self) -> Result<NodeGraph, NodeError> {
        let Self {
            config,
            factory,
            shutdown,
            time_source,
            fatal,
        } = self;

        // Stage 1: optional indexes
        let (acceptance_index, index_manager) = if config.index.acceptance_index {
            let acceptance_index = factory
                .acceptance_index()
                .stage(BuildStage::AcceptanceIndex)?;
            let index_manager = factory
                .index_manager(Arc::clone(&acceptance_index))
                .stage(BuildStage::IndexManager)?;
            debug!("Acceptance index enabled");
            (Some(acceptance_index), Some(index_manager))
        } else {
            (None, None)
        };

        // Stage 2-4: consensus
        let sig_cache = factory.sig_cache(config.dag.sig_cache_max_size);

        let dag = factory
            .dag(DagParams {
                network: config.network.network,
                time_source,
                subnetwork_id: config.dag.subnetwork_id,
                max_utxo_cache_size: config.dag.max_utxo_cache_size,
                sig_cache: Arc::clone(&sig_cache),
                index_manager: index_manager.clone(),
            })
            .stage(BuildStage::Dag)?;

        let mempool = factory
            .mempool(MempoolParams {
                dag: Arc::clone(&dag),
                sig_cache: Arc::clone(&sig_cache),
                policy: MempoolPolicy {
                    accept_non_std: config.mempool.relay_non_std,
                    max_orphan_txs: config.mempool.max_orphan_txs,
                    max_orphan_tx_size: DEFAULT_MAX_ORPHAN_TX_SIZE,
                    min_relay_tx_fee: config.mempool.min_relay_tx_fee,
                    max_tx_version: MAX_TX_VERSION,
                },
            })
            .stage(BuildStage::Mempool)?;
        debug!("Consensus components built");

        // Stage 5: networking
        let transport = factory.transport(&config).stage(BuildStage::Transport)?;
        let address_book = factory
            .address_book(&config)
            .stage(BuildStage::AddressBook)?;
        let connection_manager = factory
            .connection_manager(&config, Arc::clone(&transport), Arc::clone(&address_book))
            .stage(BuildStage::ConnectionManager)?;

        // Stage 6: protocol
        let protocol_events = Arc::new(ProtocolEventRelay::new());
        let protocol_manager = factory
            .protocol_manager(
                &config,
                ProtocolParams {
                    dag: Arc::clone(&dag),
                    transport: Arc::clone(&transport),
                    address_book: Arc::clone(&address_book),
                    mempool: Arc::clone(&mempool),
                    connection_manager: Arc::clone(&connection_manager),
                    events: protocol_events.clone(),
                },
            )
            .stage(BuildStage::ProtocolManager)?;
        debug!("Networking components built");

        // Stage 7: RPC
        let block_template_generator = factory.block_template_generator(TemplateParams {
            policy: MiningPolicy {
                block_max_mass: config.mining.block_max_mass,
            },
            mempool: Arc::clone(&mempool),
            dag: Arc::clone(&dag),
            sig_cache: Arc::clone(&sig_cache),
        });

        let rpc_server = factory
            .rpc_server(
                &config,
                RpcParams {
                    transport: Arc::clone(&transport),
                    dag: Arc::clone(&dag),
                    protocol_manager: Arc::clone(&protocol_manager),
                    connection_manager: Arc::clone(&connection_manager),
                    block_template_generator: Arc::clone(&block_template_generator),
                    mempool: Arc::clone(&mempool),
                    address_book: Arc::clone(&address_book),
                    acceptance_index: acceptance_index.clone(),
                    shutdown,
                },
            )
            .stage(BuildStage::RpcServer)?;

        // Stage 8: seed sources
        let seed_sources = build_seed_sources(factory.as_ref(), &config)?;
        let seed_coordinator = SeedCoordinator::new(seed_sources, Arc::clone(&address_book));

        // Stage 9: cross-wiring
        let bound = protocol_events.bind(Arc::clone(&rpc_server));
        debug_assert!(bound, "protocol event relay bound twice");
        Arc::new(NotificationBridge::new(
            Arc::clone(&rpc_server),
            acceptance_index.is_some(),
            Arc::clone(&fatal),
        ))
        .register(dag.as_ref());

        info!(
            acceptance_index = acceptance_index.is_some(),
            seed_sources = seed_coordinator.sources().len(),
            "Node graph built"
        );

        Ok(NodeGraph {
            config,
            acceptance_index,
            index_manager,
            sig_cache,
            dag,
            mempool,
            transport,
            address_book,
            connection_manager,
            protocol_manager,
            block_template_generator,
            rpc_server,
            seed_coordinator,
            fatal,
        })
    }
}

fn build_seed_sources(
    factory: &dyn ComponentFactory,
    config: &NodeConfig,
) -> Result<Vec<Arc<dyn SeedSource>>, NodeError> {
    let default_port = config.network.network.params().default_port;

    let mut sources: Vec<Arc<dyn SeedSource>> = config
        .dns_seed_hosts()
        .iter()
        .map(|host| factory.dns_seed_source(host, default_port, config.dag.subnetwork_id))
        .collect();

    if let Some(endpoint) = &config.network.grpc_seed {
        sources.push(
            factory
                .grpc_seed_source(endpoint)
                .stage(BuildStage::SeedSources)?,
        );
    }

    Ok(sources)
}
