//! 内置样例数据集

use chrono::{Duration, Local, NaiveDate};

use crate::models::{Agent, Contract, ContractStatus, Dataset, Message, Service, Vendor};

const AGENTS: [(&str, &str, &str); 4] = [
    ("Alice Carter", "North", "555-0101"),
    ("Ben Okafor", "South", "555-0102"),
    ("Chen Wei", "East", "555-0103"),
    ("Dana Silva", "West", "555-0104"),
];

const VENDORS: [(&str, &str); 5] = [
    ("Acme Logistics", "Logistics"),
    ("Bolt Electric", "Facilities"),
    ("Cobalt IT", "Technology"),
    ("Delta Catering", "Hospitality"),
    ("Evergreen Cleaning", "Facilities"),
];

const SERVICES: [(&str, usize, f64); 8] = [
    ("Freight forwarding", 0, 1200.0),
    ("Warehousing", 0, 800.0),
    ("Electrical maintenance", 1, 450.0),
    ("Network support", 2, 950.0),
    ("Cloud migration", 2, 5400.0),
    ("Event catering", 3, 2300.0),
    ("Office cleaning", 4, 300.0),
    ("Deep cleaning", 4, 650.0),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// 生成固定内容的样例数据（25 份合同，足够分页）
pub fn sample_dataset() -> Dataset {
    let agents: Vec<Agent> = AGENTS
        .iter()
        .enumerate()
        .map(|(i, (name, region, phone))| Agent {
            id: format!("agent-{}", i + 1),
            name: name.to_string(),
            email: format!(
                "{}@agents.example",
                name.split(' ').next().unwrap_or("agent").to_lowercase()
            ),
            phone: phone.to_string(),
            region: region.to_string(),
        })
        .collect();

    let vendors: Vec<Vendor> = VENDORS
        .iter()
        .enumerate()
        .map(|(i, (name, category))| Vendor {
            id: format!("vendor-{}", i + 1),
            name: name.to_string(),
            email: format!("sales@vendor{}.example", i + 1),
            category: category.to_string(),
        })
        .collect();

    let services: Vec<Service> = SERVICES
        .iter()
        .enumerate()
        .map(|(i, (name, vendor, price))| Service {
            id: format!("service-{}", i + 1),
            name: name.to_string(),
            vendor: VENDORS[*vendor].0.to_string(),
            price: *price,
            description: String::new(),
        })
        .collect();

    let contracts: Vec<Contract> = (0..25)
        .map(|i| {
            let service = &services[i % services.len()];
            let start = date(2024, 1 + (i % 12) as u32, 1 + (i % 28) as u32);
            Contract {
                id: format!("contract-{}", i + 1),
                title: format!("{} #{}", service.name, i + 1),
                agent: agents[i % agents.len()].name.clone(),
                vendor: service.vendor.clone(),
                service: service.name.clone(),
                value: service.price * (1 + i % 5) as f64,
                start_date: start,
                end_date: start + Duration::days(90 + 30 * (i % 4) as i64),
                status: ContractStatus::ALL[i % ContractStatus::ALL.len()],
            }
        })
        .collect();

    let now = Local::now();
    let messages = vec![
        Message {
            sent_at: now - Duration::hours(26),
            ..Message::new(
                agents[0].name.clone(),
                vendors[0].name.clone(),
                "Renewal".to_string(),
                "Can we renew the freight contract at the same rate?".to_string(),
            )
        },
        Message {
            sent_at: now - Duration::hours(3),
            ..Message::new(
                vendors[0].name.clone(),
                agents[0].name.clone(),
                "Re: Renewal".to_string(),
                "Yes, sending the draft this week.".to_string(),
            )
        },
        Message::new(
            vendors[2].name.clone(),
            agents[2].name.clone(),
            "Migration window".to_string(),
            "Proposed cutover is the first weekend of next month.".to_string(),
        ),
    ];

    Dataset {
        agents,
        vendors,
        services,
        contracts,
        messages,
        ..Dataset::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_references_are_consistent() {
        let data = sample_dataset();
        assert_eq!(data.contracts.len(), 25);
        for contract in &data.contracts {
            assert!(data.agents.iter().any(|a| a.name == contract.agent));
            assert!(data.vendors.iter().any(|v| v.name == contract.vendor));
            assert!(contract.end_date >= contract.start_date);
        }
    }
}
