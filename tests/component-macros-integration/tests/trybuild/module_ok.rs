use async_trait::async_trait;
use component_macros::Injectable;
use di_abstractions::{Injectable, ScopedResource, TargetDescriptor};
use infrastructure_common::BoxError;

#[derive(Injectable)]
#[injectable(scoped)]
struct Pool;

#[async_trait]
impl ScopedResource for Pool {
    async fn release(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Injectable)]
#[injectable(providers(Pool), exports(Pool))]
struct Storage;

#[derive(Injectable)]
#[injectable(module)]
struct Empty;

fn main() {
    assert!(TargetDescriptor::of::<Pool>().is_scoped());
    assert!(TargetDescriptor::of::<Storage>().is_module());
    assert!(TargetDescriptor::of::<Empty>().is_module());
    assert_eq!(Storage::NAME, "storage");
}
