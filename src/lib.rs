pub mod shared {
    pub mod core {
        pub mod clock;
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod audit;
        pub mod cache;
        pub mod event_bus;
        pub mod oracle;
    }
}

pub mod modules {
    pub mod meetings {
        pub mod core {
            pub mod cost;
            pub mod cycle;
            pub mod events;
            pub mod keys;
            pub mod meeting;
            pub mod state;
            pub mod views;
        }
        pub mod application {
            pub mod context;
            pub mod deps;
            pub mod errors;
            pub mod ordering;
            pub mod rollups;
        }
        pub mod use_cases {
            pub mod create_meeting {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod get_meeting {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod query;
            }
            pub mod start_meeting {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod stop_meeting {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod update_meeting {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod delete_meeting {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod list_meetings {
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod query;
            }
            pub mod get_meeting_cost {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod query;
            }
            pub mod participation {
                pub mod command;
                pub mod decide;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod subscribe_to_meeting {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
                pub mod query;
                pub mod stream;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod event_publisher;
                pub mod ledger;
                pub mod ledger_in_memory;
                pub mod meeting_reader;
            }
        }
    }
}

pub mod shell;
