#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to run a test under every minimum-order
// policy, for behaviour the policies are expected to share

#[template]
#[rstest]
#[case::strict(procure_solver::MinimumOrderPolicy::Strict)]
#[case::sole_source_exempt(procure_solver::MinimumOrderPolicy::SoleSourceExempt)]
pub fn all_policies(#[case] policy: procure_solver::MinimumOrderPolicy) {}
