mod skill_gap_tests;
