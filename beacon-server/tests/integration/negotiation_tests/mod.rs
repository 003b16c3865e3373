mod test_call_rejected_relay;
mod test_offline_target_rejected;
