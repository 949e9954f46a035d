use geo::{polygon, MultiPolygon};
use proptest::prelude::*;

use wardpop_core::{GeometryUnit, JoinStrategy, PopulationRecord};
use wardpop_recon::{reconcile, NormalizeConfig, Normalizer, ReconConfig, Reconciler};

fn record(region: &str, council: &str, ward: &str, total: u64) -> PopulationRecord {
    PopulationRecord {
        region: region.into(),
        council: council.into(),
        ward: ward.into(),
        total_pop: total,
        male_pop: total / 2,
        female_pop: total - total / 2,
    }
}

fn unit(region: &str, district: &str, ward: &str) -> GeometryUnit {
    let cell = polygon![(x: 35.0, y: -6.0), (x: 35.1, y: -6.0), (x: 35.1, y: -6.1), (x: 35.0, y: -6.1)];
    let mut properties = serde_json::Map::new();
    properties.insert("reg_name".into(), region.into());
    properties.insert("dist_name".into(), district.into());
    properties.insert("ward_name".into(), ward.into());
    GeometryUnit {
        region_name: region.into(),
        district_name: district.into(),
        ward_name: ward.into(),
        geometry: MultiPolygon(vec![cell]),
        properties,
        origin: Default::default(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn council_suffix_still_matches_exactly() {
    let records = vec![record("DODOMA", "CHAMWINO DISTRICT COUNCIL", "MAKOJE", 12_408)];
    let out = reconcile(&records, vec![unit("Dodoma", "Chamwino", "Makoje")], &ReconConfig::default())
        .unwrap();

    let makoje = &out.units[0];
    assert_eq!(makoje.population.unwrap().total, 12_408);
    assert_eq!(makoje.matched_by, Some(JoinStrategy::ExactTriple));
    assert_eq!(out.report.matched_by_strategy[0].matched, 1);
    assert_eq!(out.report.matched_by_strategy[1].matched, 0);
}

#[test]
fn divergent_district_matches_on_region_and_ward() {
    let records = vec![
        record("DODOMA", "CHAMWINO DISTRICT COUNCIL", "MAKOJE", 12_408),
        record("DODOMA", "KONDOA TOWN COUNCIL", "BOLISA", 9_000),
    ];
    let units = vec![
        unit("Dodoma", "Dodoma Rural", "Makoje"),
        unit("Dodoma", "Kondoa", "Bolisa"),
        unit("Dodoma", "Kondoa", "Nowhere"),
    ];
    let out = reconcile(&records, units, &ReconConfig::default()).unwrap();

    assert_eq!(out.units[0].matched_by, Some(JoinStrategy::RegionWard));
    assert_eq!(out.units[0].population.unwrap().total, 12_408);
    assert_eq!(out.units[1].matched_by, Some(JoinStrategy::ExactTriple));
    assert!(out.units[2].population.is_none());

    let r = &out.report;
    assert_eq!(r.unmatched_after_first_pass, 2);
    assert_eq!(r.matched, 2);
    assert_eq!(r.unmatched, 1);
    assert!((r.match_rate_pct - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(r.cumulative_match_rates().len(), 2);
}

#[test]
fn spelling_override_joins() {
    let records = vec![record("ARUSHA", "MERU DISTRICT COUNCIL", "USA-RIVER", 33_490)];
    let out = reconcile(&records, vec![unit("Arusha", "Meru", "Usa River")], &ReconConfig::default())
        .unwrap();
    assert_eq!(out.units[0].population.unwrap().total, 33_490);
}

#[test]
fn exact_only_strategy_list() {
    let config = ReconConfig::from_toml(r#"strategies = ["exact_triple"]"#).unwrap();
    let records = vec![record("DODOMA", "CHAMWINO DISTRICT COUNCIL", "MAKOJE", 12_408)];
    let out = reconcile(&records, vec![unit("Dodoma", "Dodoma Rural", "Makoje")], &config).unwrap();
    assert!(out.units[0].population.is_none());
    assert_eq!(out.report.matched_by_strategy.len(), 1);
}

#[test]
fn shared_record_across_units() {
    // Two polygons for one census ward both receive its counts.
    let records = vec![record("PWANI", "MAFIA DISTRICT COUNCIL", "KIRONGWE", 5_000)];
    let units = vec![unit("Pwani", "Mafia", "Kirongwe"), unit("Pwani", "Mafia", "Kirongwe")];
    let out = reconcile(&records, units, &ReconConfig::default()).unwrap();
    assert!(out.units.iter().all(|u| u.population.is_some()));
    assert_eq!(out.report.unmatched_population_records, 0);
}

#[test]
fn properties_pass_through() {
    let records = vec![record("DODOMA", "CHAMWINO DISTRICT COUNCIL", "MAKOJE", 12_408)];
    let out = reconcile(&records, vec![unit("Dodoma", "Chamwino", "Makoje")], &ReconConfig::default())
        .unwrap();
    assert_eq!(out.units[0].unit.properties["dist_name"], "Chamwino");
    assert_eq!(out.units[0].unit.geometry.0.len(), 1);
}

#[test]
fn report_serializes() {
    let out = reconcile(&[], vec![unit("Dodoma", "Chamwino", "Water")], &ReconConfig::default())
        .unwrap();
    let json = serde_json::to_value(&out.report).unwrap();
    assert_eq!(json["excluded_units"], 1);
    assert_eq!(json["geometry_units"], 0);
    assert_eq!(json["match_rate_pct"], 0.0);
    assert_eq!(json["meta"]["strategies"][1], "region_ward");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn normalizer() -> Normalizer {
    Normalizer::new(&NormalizeConfig::default()).unwrap()
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 ./'()-]{0,24}",
        "[0-9]{1,3}[. ]{1,2}[A-Za-z]{1,10}( (District|Council|Town|City|ya|wa))?",
        proptest::sample::select(vec![
            "Usa River", "USA-RIVER", "Matale", "Oloirien / Magaiduru", "Viwanja Sitini",
            "Halmashauri ya Wilaya", "City 1 City 2 Kilimani", "",
        ])
        .prop_map(String::from),
    ]
}

fn arb_side() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    proptest::collection::vec((0u8..3, 0u8..4, 0u8..6), 0..12)
}

const REGIONS: [&str; 3] = ["Dodoma", "Arusha", "Mwanza"];
const DISTRICTS: [&str; 4] = ["Chamwino", "Chamwino District Council", "Meru", "Ilemela"];
const WARDS: [&str; 6] = ["Makoje", "Haneti", "Usa River", "USA-RIVER", "Buswelu", "Water"];

proptest! {
    #[test]
    fn normalize_is_idempotent(name in arb_name()) {
        let n = normalizer();
        let once = n.normalize(&name);
        prop_assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn normalize_ignores_case(name in "[A-Za-z .-]{0,20}") {
        let n = normalizer();
        prop_assert_eq!(n.normalize(&name.to_lowercase()), n.normalize(&name.to_uppercase()));
    }

    #[test]
    fn fallback_never_lowers_match_rate(records in arb_side(), units in arb_side()) {
        let records: Vec<PopulationRecord> = records
            .iter()
            .map(|&(r, d, w)| record(REGIONS[r as usize], DISTRICTS[d as usize], WARDS[w as usize], 100))
            .collect();
        let units: Vec<GeometryUnit> = units
            .iter()
            .map(|&(r, d, w)| unit(REGIONS[r as usize], DISTRICTS[d as usize], WARDS[w as usize]))
            .collect();
        let input_units = units.len();

        let exact = Reconciler::new(ReconConfig {
            strategies: vec![JoinStrategy::ExactTriple],
            ..Default::default()
        })
        .unwrap()
        .reconcile(&records, units.clone());
        let both = Reconciler::new(ReconConfig::default()).unwrap().reconcile(&records, units);

        prop_assert!(both.report.match_rate_pct >= exact.report.match_rate_pct);
        let rates = both.report.cumulative_match_rates();
        prop_assert!(rates.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(rates[0], exact.report.match_rate_pct);

        // Cardinality: every non-excluded unit exactly once, in order.
        prop_assert_eq!(both.units.len(), input_units - both.report.excluded_units);
        prop_assert_eq!(both.report.matched + both.report.unmatched, both.units.len());
        prop_assert!(both.units.iter().all(|u| u.unit.ward_name.to_uppercase() != "WATER"));
        prop_assert!(both.units.iter().all(|u| u.population.is_some() == u.matched_by.is_some()));
    }
}
