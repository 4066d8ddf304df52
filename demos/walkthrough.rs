//! End-to-end walkthrough of one workflow session against the mock lookup
//! service and a sled-backed address book.
//!
//! Run with: cargo run --example walkthrough

use address_workflow::{
    book::SledAddressBook,
    lookup::LookupClient,
    mock::MockLookupService,
    workflow::{AddressWorkflow, FIRST_NAME, HOUSE_NUMBER, LAST_NAME, POST_CODE},
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let db = sled::open(std::env::temp_dir().join("address_workflow_walkthrough.db"))?;
    let book = SledAddressBook::new(Arc::new(db));

    // the default mock delays successful lookups so the loading flag is
    // visible below
    let client = LookupClient::new(MockLookupService::new());
    let mut workflow = AddressWorkflow::new();

    workflow.set_fields([(POST_CODE, "1015"), (HOUSE_NUMBER, "117")]);
    let dispatch = workflow
        .submit_search()
        .expect("search inputs are well formed");
    println!(
        "searching postcode {} number {} (loading: {})",
        dispatch.query.postcode,
        dispatch.query.streetnumber,
        workflow.is_loading()
    );

    let outcome = client.fetch(&dispatch.query.postcode, &dispatch.query.streetnumber);
    workflow.resolve_lookup(dispatch.token, outcome);

    if let Some(message) = workflow.error() {
        println!("lookup failed: {message}");
        return Ok(());
    }

    println!("candidates:");
    for address in workflow.results() {
        println!(
            "  [{}] {} {}, {} {}",
            address.id, address.street, address.house_number, address.postcode, address.city
        );
    }

    // pick the first candidate and attach a person to it
    let picked = workflow.results()[0].id.clone();
    workflow.select_candidate(&picked);
    workflow.set_fields([(FIRST_NAME, "Ada"), (LAST_NAME, "Lovelace")]);

    let mut collaborator = book;
    if !workflow.submit_person_info(&mut collaborator) {
        println!("submission rejected: {:?}", workflow.error());
        return Ok(());
    }

    println!("address book now holds:");
    for stored in collaborator.entries()? {
        println!(
            "  {} {} — {} {}, {} {} (added {}, id {})",
            stored.entry.first_name,
            stored.entry.last_name,
            stored.entry.address.street,
            stored.entry.address.house_number,
            stored.entry.address.postcode,
            stored.entry.address.city,
            stored.added_at.to_datetime_utc(),
            stored.id
        );
    }

    Ok(())
}
