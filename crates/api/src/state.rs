//! Shared application state.

use std::sync::Arc;

use repository::{CategoryRepository, OrderRepository, ProductRepository, RequesterRepository};
use storage::StorageGateway;
use workflow::{IntakeSaga, OrderStatusWorkflow, PublicationSaga};

/// Object-safe handles to the collaborators behind the workflow.
pub type DynGateway = Arc<dyn StorageGateway>;
pub type DynOrders = Arc<dyn OrderRepository>;
pub type DynProducts = Arc<dyn ProductRepository>;
pub type DynCategories = Arc<dyn CategoryRepository>;
pub type DynRequesters = Arc<dyn RequesterRepository>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub intake: IntakeSaga<DynGateway, DynOrders, DynRequesters>,
    pub publication: PublicationSaga<DynGateway, DynOrders, DynProducts, DynCategories>,
    pub status: OrderStatusWorkflow<DynGateway, DynOrders>,
    pub gateway: DynGateway,
    pub orders: DynOrders,
    pub products: DynProducts,
    pub categories: DynCategories,
}

impl AppState {
    /// Wires the three workflow components over one set of collaborators.
    pub fn new(
        gateway: DynGateway,
        orders: DynOrders,
        products: DynProducts,
        categories: DynCategories,
        requesters: DynRequesters,
    ) -> Arc<Self> {
        let intake = IntakeSaga::new(gateway.clone(), orders.clone(), requesters);
        let publication = PublicationSaga::new(
            gateway.clone(),
            orders.clone(),
            products.clone(),
            categories.clone(),
        );
        let status = OrderStatusWorkflow::new(gateway.clone(), orders.clone());

        Arc::new(Self {
            intake,
            publication,
            status,
            gateway,
            orders,
            products,
            categories,
        })
    }
}
