//! Demo accounts and campus data installed at startup.

use chrono::{Duration, Utc};
use nanoid::nanoid;
use tracing::info;

use crate::{
    models::{Announcement, Location, Role},
    Portal,
};

const USERS: &[(&str, &str, Role)] = &[
    ("1RN21CS001", "student123", Role::Student),
    ("1RN25EC014-T", "idk", Role::Student),
    ("1RN25EC208-T", "idc", Role::Student),
    ("RNSIT0001", "lecturer123", Role::Lecturer),
    ("PRINCIPAL001", "principal123", Role::Principal),
];

// name, type, latitude, longitude, address, phone, website
#[rustfmt::skip]
const LOCATIONS: &[(&str, &str, f64, f64, &str, &str, Option<&str>)] = &[
    ("Central Library", "library", 12.9017, 77.5192, "Main Building, RNSIT Campus", "+91-80-2861-1880", Some("https://www.rnsit.ac.in")),
    ("Student Cafeteria", "food", 12.9025, 77.5195, "Central Plaza, Near Main Gate", "+91-80-2861-1885", None),
    ("Computer Science Department", "building", 12.9012, 77.5200, "CSE Block, Academic Building", "+91-80-2861-1900", None),
    ("Sports Complex", "sports", 12.9010, 77.5175, "Ground & Court Area", "+91-80-2861-1920", None),
    ("Main Academic Building", "building", 12.9022, 77.5188, "Main Building - Block A", "+91-80-2861-1900", None),
    ("Auditorium", "building", 12.9008, 77.5192, "Central Auditorium Hall", "+91-80-2861-1850", None),
    ("Main Entrance Gate", "building", 12.9030, 77.5185, "Uttarahalli-Kengeri Main Road", "+91-80-2861-1880", None),
    ("Research & Development Lab", "building", 12.9015, 77.5170, "Advanced Research Zone", "+91-80-2861-1930", None),
    ("Hostel Complex", "building", 12.8995, 77.5190, "Boys and Girls Hostels", "+91-80-2861-1950", None),
    ("Engineering Labs", "building", 12.9020, 77.5205, "State-of-the-art Lab Facilities", "+91-80-2861-1910", None),
];

// title, content, category, age in days
const ANNOUNCEMENTS: &[(&str, &str, &str, i64)] = &[
    ("Winter Break", "Campus will be closed from Dec 20 - Jan 5", "holiday", 1),
    ("Maintenance Work", "WiFi will be down on Dec 18, 9 PM - 12 AM", "maintenance", 2),
    ("Sports Day", "Inter-class sports competition on Dec 22", "event", 3),
    ("Library Notice", "New study materials added to central library", "notice", 4),
];

pub async fn install(portal: &Portal) -> anyhow::Result<()> {
    let mut principal = None;
    for &(username, password, role) in USERS {
        let user = portal.identity.register(username, password, role).await?;
        if role == Role::Principal {
            principal = Some(user);
        }
    }
    let principal = principal.ok_or_else(|| anyhow::anyhow!("no principal among demo users"))?;

    for (i, &(name, kind, latitude, longitude, address, phone, website)) in
        LOCATIONS.iter().enumerate()
    {
        portal
            .locations
            .insert(Location {
                id: (i + 1).to_string(),
                name: name.to_owned(),
                kind: kind.to_owned(),
                latitude,
                longitude,
                address: Some(address.to_owned()),
                phone: Some(phone.to_owned()),
                website: website.map(str::to_owned),
            })
            .await;
    }

    let now = Utc::now();
    for &(title, content, category, age) in ANNOUNCEMENTS {
        portal
            .announcements
            .insert(Announcement {
                id: nanoid!(),
                title: title.to_owned(),
                content: content.to_owned(),
                category: Some(category.to_owned()),
                author_id: principal.id.clone(),
                author_role: principal.role,
                created_at: now - Duration::days(age),
            })
            .await;
    }

    info!(
        users = USERS.len(),
        locations = LOCATIONS.len(),
        announcements = ANNOUNCEMENTS.len(),
        "demo data installed"
    );
    Ok(())
}
