//! Deployment of the workforce cost model to a managed endpoint

pub mod error;
pub mod plan;
pub mod provisioner;

pub use error::{DeployError, Result};
pub use plan::{DeploymentPlan, DeploymentRequest};
pub use provisioner::{
    deploy, wait_for_endpoint, DeploymentOutcome, EndpointState, HostingProvisioner,
    SageMakerProvisioner, WaitPolicy,
};
