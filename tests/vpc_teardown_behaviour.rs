//! Behavioural scenarios for staged VPC teardown.

mod vpc_teardown;
