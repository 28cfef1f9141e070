// cargo test -p festival-crew-allocation-optimizer --test scenarios

use festival_crew_allocation_optimizer::engine::UnassignedReason;
use festival_crew_allocation_optimizer::{
    run_auto_assignment, run_auto_assignment_with_progress, AllocationError, Crew,
    CrewConfigError, CrewId, Outcome, Roster, Volunteer, VolunteerId,
};
use pretty_assertions::assert_eq;

fn assigned_crew<'a>(roster: &'a Roster, volunteer: &str) -> Option<&'a str> {
    roster
        .volunteer(&VolunteerId::from(volunteer))
        .and_then(|volunteer| volunteer.assigned_crew.as_ref())
        .map(|crew| crew.0.as_str())
}

fn members(roster: &Roster, crew: &str) -> Vec<String> {
    roster
        .crew(&CrewId::from(crew))
        .map(|crew| crew.assigned_volunteers.iter().map(|id| id.0.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn better_match_takes_the_last_slot() {
    let volunteers = vec![
        Volunteer::new("x", ["A", "B", "C"]),
        Volunteer::new("y", ["A"]),
    ];
    let crews = vec![Crew::new("crew", ["A", "B", "C"], 1, 1)];

    let roster = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&roster, "x"), Some("crew"));
    assert_eq!(assigned_crew(&roster, "y"), None);
    assert_eq!(members(&roster, "crew"), ["x"]);
    roster.check_invariants().unwrap();
}

#[test]
fn input_order_does_not_beat_score() {
    let volunteers = vec![
        Volunteer::new("y", ["A"]),
        Volunteer::new("x", ["A", "B", "C"]),
    ];
    let crews = vec![Crew::new("crew", ["A", "B", "C"], 1, 1)];

    let roster = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&roster, "x"), Some("crew"));
    assert_eq!(assigned_crew(&roster, "y"), None);
    // output keeps the input order
    assert_eq!(roster.volunteers()[0].id, VolunteerId::from("y"));
}

#[test]
fn no_overlap_stays_unassigned() {
    let volunteers = vec![Volunteer::new("v", ["Z"])];
    let crews = vec![
        Crew::new("stage", ["sound"], 1, 3),
        Crew::new("bar", ["cashier"], 1, 3),
    ];

    let roster = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&roster, "v"), None);
    assert_eq!(roster.crews(), crews.as_slice());
}

#[test]
fn empty_required_skills_fail_before_anything_happens() {
    let volunteers = vec![Volunteer::new("v", ["sound"])];
    let crews = vec![
        Crew::new("stage", ["sound"], 1, 3),
        Crew::new("void", Vec::<&str>::new(), 1, 3),
    ];

    let mut calls = 0;
    let result = run_auto_assignment_with_progress(&volunteers, &crews, |_| calls += 1);
    assert_eq!(
        result,
        Err(AllocationError::Configuration(
            CrewConfigError::NoRequiredSkills(CrewId::from("void"))
        ))
    );
    assert_eq!(calls, 0);
}

#[test]
fn manual_assign_to_full_crew_is_rejected() {
    let volunteers = vec![Volunteer::new("a", ["sound"]), Volunteer::new("v", ["sound"])];
    let crews = vec![Crew::new("stage", ["sound"], 1, 1)];
    let mut roster = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&roster, "a"), Some("stage"));
    let before = roster.clone();

    let result = roster.assign(&VolunteerId::from("v"), &CrewId::from("stage"));
    assert_eq!(
        result,
        Err(AllocationError::CapacityExceeded {
            crew: CrewId::from("stage"),
            max_volunteers: 1
        })
    );
    assert_eq!(roster, before);
}

#[test]
fn rerun_discards_manual_assignments() {
    let volunteers = vec![
        Volunteer::new("anna", ["sound", "lights"]),
        Volunteer::new("ben", ["cooking"]),
    ];
    let crews = vec![
        Crew::new("stage", ["sound", "lights"], 1, 1),
        Crew::new("kitchen", ["cooking"], 1, 2),
    ];
    let mut roster = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&roster, "anna"), Some("stage"));

    roster.unassign(&VolunteerId::from("anna")).unwrap();
    roster
        .assign(&VolunteerId::from("anna"), &CrewId::from("kitchen"))
        .unwrap();
    roster.check_invariants().unwrap();

    let (volunteers, crews) = roster.into_parts();
    let rerun = run_auto_assignment(&volunteers, &crews).unwrap();
    assert_eq!(assigned_crew(&rerun, "anna"), Some("stage"));
    assert_eq!(members(&rerun, "kitchen"), ["ben"]);
    rerun.check_invariants().unwrap();
}

#[test]
fn equal_scores_keep_input_order() {
    let volunteers = vec![
        Volunteer::new("first", ["tickets"]),
        Volunteer::new("second", ["tickets"]),
        Volunteer::new("third", ["tickets"]),
    ];
    let crews = vec![
        Crew::new("north-gate", ["tickets"], 1, 1),
        Crew::new("south-gate", ["tickets"], 1, 1),
    ];

    let mut order = Vec::new();
    let roster = run_auto_assignment_with_progress(&volunteers, &crews, |progress| {
        order.push(progress.volunteer.0.clone());
    })
    .unwrap();

    assert_eq!(order, ["first", "second", "third"]);
    assert_eq!(assigned_crew(&roster, "first"), Some("north-gate"));
    assert_eq!(assigned_crew(&roster, "second"), Some("south-gate"));
    assert_eq!(assigned_crew(&roster, "third"), None);
}

#[test]
fn progress_is_reported_once_per_volunteer_in_ranked_order() {
    let volunteers = vec![
        Volunteer::new("low", ["sound"]),
        Volunteer::new("none", Vec::<&str>::new()),
        Volunteer::new("high", ["sound", "lights"]),
        Volunteer::new("late", ["lights"]),
    ];
    let crews = vec![Crew::new("stage", ["sound", "lights"], 1, 2)];

    let mut reports = Vec::new();
    run_auto_assignment_with_progress(&volunteers, &crews, |progress| {
        reports.push(progress.clone());
    })
    .unwrap();

    assert_eq!(
        reports.iter().map(|progress| progress.processed).collect::<Vec<_>>(),
        [1, 2, 3, 4]
    );
    assert!(reports.iter().all(|progress| progress.total == 4));
    assert_eq!(
        reports
            .iter()
            .map(|progress| progress.volunteer.0.as_str())
            .collect::<Vec<_>>(),
        ["high", "low", "late", "none"]
    );
    assert!(matches!(reports[0].outcome, Outcome::Assigned { .. }));
    assert_eq!(
        reports[2].outcome,
        Outcome::Unassigned(UnassignedReason::NoCapacity)
    );
    assert_eq!(
        reports[3].outcome,
        Outcome::Unassigned(UnassignedReason::NoCapacity)
    );
    assert_eq!(
        reports[0].to_string(),
        "[1/4] assigned high to stage (100% match)"
    );
}

#[test]
fn empty_inputs() {
    let mut stage = Crew::new("stage", ["sound"], 1, 2);
    stage.assigned_volunteers.insert(VolunteerId::from("anna"));
    let crews = vec![stage, Crew::new("bar", ["cashier"], 1, 2)];
    let mut calls = 0;
    let roster = run_auto_assignment_with_progress(&[], &crews, |_| calls += 1).unwrap();
    assert_eq!(roster.crews(), crews.as_slice());
    assert_eq!(members(&roster, "stage"), ["anna"]);
    assert!(roster.volunteers().is_empty());
    assert_eq!(calls, 0);

    let volunteers = vec![Volunteer::new("anna", ["sound"])];
    let roster = run_auto_assignment(&volunteers, &[]).unwrap();
    assert_eq!(assigned_crew(&roster, "anna"), None);
    assert_eq!(roster.summary().unassigned, [VolunteerId::from("anna")]);
}

#[test]
fn empty_skill_set_is_not_an_error() {
    let volunteers = vec![Volunteer::new("anna", Vec::<&str>::new())];
    let crews = vec![Crew::new("stage", ["sound"], 1, 2)];

    let mut outcomes = Vec::new();
    let roster = run_auto_assignment_with_progress(&volunteers, &crews, |progress| {
        outcomes.push(progress.outcome.clone());
    })
    .unwrap();
    assert_eq!(assigned_crew(&roster, "anna"), None);
    assert_eq!(
        outcomes,
        [Outcome::Unassigned(UnassignedReason::NoSkillOverlap)]
    );
}

#[test]
fn stale_assignments_in_the_input_are_reset() {
    let mut anna = Volunteer::new("anna", ["cooking"]);
    anna.assigned_crew = Some(CrewId::from("removed-crew"));
    let mut stage = Crew::new("stage", ["sound"], 1, 2);
    stage.assigned_volunteers.insert(VolunteerId::from("ghost"));

    let roster = run_auto_assignment(&[anna], &[stage]).unwrap();
    assert_eq!(assigned_crew(&roster, "anna"), None);
    assert!(members(&roster, "stage").is_empty());
    roster.check_invariants().unwrap();
}

#[test]
fn understaffed_crews_are_summarized() {
    let volunteers = vec![Volunteer::new("anna", ["sound"])];
    let crews = vec![
        Crew::new("stage", ["sound"], 2, 4),
        Crew::new("bar", ["cashier"], 1, 2),
    ];
    let summary = run_auto_assignment(&volunteers, &crews).unwrap().summary();
    assert_eq!(summary.assigned, 1);
    assert_eq!(
        summary.understaffed,
        [CrewId::from("stage"), CrewId::from("bar")]
    );
}

#[test]
fn load_demo_roster() {
    #[derive(serde::Deserialize)]
    struct RosterFile {
        volunteers: Vec<Volunteer>,
        crews: Vec<Crew>,
    }

    let file: RosterFile = serde_json::from_str(include_str!("../../demos/festival.json")).unwrap();
    let roster = run_auto_assignment(&file.volunteers, &file.crews).unwrap();
    roster.check_invariants().unwrap();
    assert!(roster.summary().assigned > 0);
}
