use shift_core::clock::Clock;
use shift_core::context::build_context;
use shift_core::store::Store;

pub fn run(store: &dyn Store, clock: &dyn Clock) -> anyhow::Result<()> {
    let context = build_context(store, clock);
    if context.is_empty() {
        println!("(no activity recorded yet)");
    } else {
        println!("{context}");
    }
    Ok(())
}
