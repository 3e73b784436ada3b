mod credential_broker_test;
