//! Hardcoded content shown when a section's backend has nothing usable.

use serde_json::{json, Value};

use super::SectionKind;
use crate::content::ContentRecord;

pub fn fallback_record(kind: SectionKind) -> ContentRecord {
    let value = match kind {
        SectionKind::Hero => hero(),
        SectionKind::About => about(),
        _ => Value::Null,
    };
    ContentRecord::from_value(value).unwrap_or_default()
}

pub fn fallback_list(kind: SectionKind) -> Vec<ContentRecord> {
    let items = match kind {
        SectionKind::Services => services(),
        SectionKind::Testimonials => testimonials(),
        SectionKind::Team => team(),
        SectionKind::Jobs => jobs(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(ContentRecord::from_value)
        .collect()
}

fn hero() -> Value {
    json!({
        "title": "Reliable Logistics, Delivered On Time",
        "subtitle": "Road, air and ocean freight with end-to-end tracking across the region.",
        "cta_label": "Book a Shipment",
        "cta_href": "#booking",
        "secondary_cta_label": "Our Services",
        "secondary_cta_href": "#services",
        "image_url": "/images/hero-fleet.jpg"
    })
}

fn about() -> Value {
    json!({
        "title": "About Us",
        "body": "For over two decades we have moved cargo for manufacturers, retailers and families. Our own fleet and warehouse network let us control every leg of the journey.",
        "mission": "To make shipping simple, transparent and dependable for every customer.",
        "years_in_business": 20,
        "shipments_delivered": "50,000+",
        "image_url": "/images/about-warehouse.jpg"
    })
}

fn services() -> Vec<Value> {
    vec![
        json!({
            "id": "fallback-road",
            "title": "Road Freight",
            "description": "Full and part truckload services with door-to-door delivery.",
            "icon": "truck",
            "display_order": 1
        }),
        json!({
            "id": "fallback-air",
            "title": "Air Freight",
            "description": "Time-critical shipments moved through our airline partners.",
            "icon": "plane",
            "display_order": 2
        }),
        json!({
            "id": "fallback-ocean",
            "title": "Ocean Freight",
            "description": "FCL and LCL container shipping with customs clearance.",
            "icon": "ship",
            "display_order": 3
        }),
        json!({
            "id": "fallback-warehousing",
            "title": "Warehousing",
            "description": "Secure storage, pick-and-pack and inventory management.",
            "icon": "warehouse",
            "display_order": 4
        }),
    ]
}

fn testimonials() -> Vec<Value> {
    vec![
        json!({
            "id": "fallback-testimonial-1",
            "name": "Sarah Lim",
            "company": "Harbourline Retail",
            "quote": "Every delivery arrived on schedule through our busiest season.",
            "rating": 5,
            "display_order": 1
        }),
        json!({
            "id": "fallback-testimonial-2",
            "name": "Daniel Okafor",
            "company": "Greenfield Manufacturing",
            "quote": "Their tracking updates mean we always know where our stock is.",
            "rating": 5,
            "display_order": 2
        }),
    ]
}

fn team() -> Vec<Value> {
    vec![
        json!({
            "id": "fallback-team-1",
            "name": "Operations Team",
            "role": "Dispatch & Fleet",
            "bio": "Coordinating pickups and deliveries around the clock.",
            "display_order": 1
        }),
        json!({
            "id": "fallback-team-2",
            "name": "Customer Care",
            "role": "Support",
            "bio": "Answering shipment questions seven days a week.",
            "display_order": 2
        }),
    ]
}

fn jobs() -> Vec<Value> {
    vec![json!({
        "id": "fallback-general-application",
        "title": "General Application",
        "location": "Any location",
        "employment_type": "Full-time",
        "description": "No open roles right now. Send us your details and we will be in touch.",
        "display_order": 1
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_section_has_fallback() {
        for kind in SectionKind::ALL {
            if kind.is_single() {
                assert!(!fallback_record(kind).is_empty(), "{} fallback empty", kind);
            } else {
                assert!(!fallback_list(kind).is_empty(), "{} fallback empty", kind);
            }
        }
    }
}
