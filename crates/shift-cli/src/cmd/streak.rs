use crate::output::print_json;
use shift_core::clock::Clock;
use shift_core::store::Store;
use shift_core::streak;

pub fn run(store: &dyn Store, clock: &dyn Clock, json: bool) -> anyhow::Result<()> {
    streak::rollover(store, clock)?;
    let state = streak::load_streak(store);
    let week = streak::load_week(store);
    let tier = streak::identity_tier(state.current);
    let next_milestone = streak::MILESTONES.iter().copied().find(|m| *m > state.current);

    if json {
        print_json(&serde_json::json!({
            "current": state.current,
            "longest": state.longest,
            "identity": tier.label(),
            "week": week,
            "week_rate": streak::week_rate(&week),
            "next_milestone": next_milestone,
        }))?;
        return Ok(());
    }

    println!("streak:   {} days (longest {})", state.current, state.longest);
    println!("identity: {}", tier.label());
    println!("week:     {}% of planned tasks completed", streak::week_rate(&week));
    if let Some(m) = next_milestone {
        println!("next milestone: {m} days");
    }
    Ok(())
}
