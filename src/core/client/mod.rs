pub mod apply;
pub mod kube_client;
