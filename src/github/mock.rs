//! Scripted transport for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;

use super::documents;
use super::{GqlResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    pub document: String,
    pub variables: Value,
    pub at: Instant,
}

impl Call {
    pub fn is(&self, document: &str) -> bool {
        self.document == document
    }
}

type Responder = Box<dyn Fn(&Call, usize) -> GqlResponse + Send + Sync>;

/// Records every call and answers through `responder(call, n)` where `n`
/// counts earlier calls of the same kind.
pub struct MockTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    responder: Responder,
    latency: Duration,
}

impl MockTransport {
    pub fn new(responder: impl Fn(&Call, usize) -> GqlResponse + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
            latency: Duration::ZERO,
        }
    }

    /// Answers every query with the sample fixture and every mutation
    /// with a successful payload.
    pub fn serving_fixture() -> Self {
        Self::new(|call, _| match call.kind {
            CallKind::Query => GqlResponse::ok(sample_app_data()),
            CallKind::Mutation => GqlResponse::ok(mutation_payload(call)),
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.count(CallKind::Query)
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == CallKind::Mutation)
            .collect()
    }

    fn count(&self, kind: CallKind) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.kind == kind).count()
    }

    async fn respond(&self, kind: CallKind, document: &str, variables: Value) -> GqlResponse {
        let call = Call {
            kind,
            document: document.to_string(),
            variables,
            at: Instant::now(),
        };
        let n = self.count(kind);
        self.calls.lock().unwrap().push(call.clone());
        let resp = (self.responder)(&call, n);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        resp
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn query(&self, document: &str, variables: Value) -> GqlResponse {
        self.respond(CallKind::Query, document, variables).await
    }

    async fn mutation(&self, document: &str, variables: Value) -> GqlResponse {
        self.respond(CallKind::Mutation, document, variables).await
    }
}

pub fn mutation_payload(call: &Call) -> Value {
    let var = |name: &str| call.variables.get(name).cloned().unwrap_or(Value::Null);
    let document = call.document.as_str();
    if document == documents::CREATE_PROJECT {
        json!({ "createProjectV2": { "projectV2": { "id": "P_new", "title": var("title") } } })
    } else if document == documents::UPDATE_PROJECT {
        json!({ "updateProjectV2": { "projectV2": { "id": var("projectId") } } })
    } else if document == documents::DELETE_PROJECT {
        json!({ "deleteProjectV2": { "projectV2": { "id": var("projectId") } } })
    } else if document == documents::LINK_REPOSITORY {
        json!({ "linkProjectV2ToRepository": { "repository": { "id": var("repositoryId") } } })
    } else if document == documents::UNLINK_REPOSITORY {
        json!({ "unlinkProjectV2FromRepository": { "repository": { "id": var("repositoryId") } } })
    } else if document == documents::CREATE_ISSUE {
        json!({ "createIssue": { "issue": { "id": "I_new", "title": var("title") } } })
    } else if document == documents::UPDATE_ISSUE {
        json!({ "updateIssue": { "issue": { "id": var("id") } } })
    } else if document == documents::ADD_PROJECT_ITEM {
        json!({ "addProjectV2ItemById": { "item": { "id": "PVTI_new" } } })
    } else if document == documents::UPDATE_ITEM_STATUS {
        json!({ "updateProjectV2ItemFieldValue": { "projectV2Item": { "id": var("itemId") } } })
    } else if document == documents::CLEAR_ITEM_STATUS {
        json!({ "clearProjectV2ItemFieldValue": { "projectV2Item": { "id": var("itemId") } } })
    } else if document == documents::DELETE_PROJECT_ITEM {
        json!({ "deleteProjectV2Item": { "deletedItemId": var("itemId") } })
    } else if document == documents::DELETE_ISSUE {
        json!({ "deleteIssue": { "repository": { "id": "R_1" } } })
    } else if document == documents::CREATE_LABEL {
        json!({ "createLabel": { "label": {
            "id": "L_new", "name": var("name"), "color": var("color"), "description": var("description")
        } } })
    } else if document == documents::UPDATE_LABEL {
        json!({ "updateLabel": { "label": {
            "id": var("id"), "name": var("name"), "color": var("color"), "description": var("description")
        } } })
    } else if document == documents::DELETE_LABEL {
        json!({ "deleteLabel": { "clientMutationId": null } })
    } else {
        json!({})
    }
}

/// Combined-query payload: one repository, one project with a Status
/// field (Todo / In Progress / Done) and four items.
pub fn sample_app_data() -> Value {
    let repo = json!({
        "id": "R_1",
        "name": "widgets",
        "nameWithOwner": "octocat/widgets",
        "description": "Widget factory",
        "url": "https://github.com/octocat/widgets",
        "createdAt": "2024-01-02T03:04:05Z",
        "owner": { "login": "octocat", "avatarUrl": "https://avatars/octocat" },
        "labels": { "nodes": [
            { "id": "L_bug", "name": "bug", "color": "d73a4a", "description": "Something isn't working" },
            { "id": "L_docs", "name": "docs", "color": "#0075ca", "description": null }
        ]}
    });

    json!({
        "viewer": {
            "id": "U_1",
            "login": "octocat",
            "name": "The Octocat",
            "avatarUrl": "https://avatars/octocat",
            "bio": null,
            "location": "San Francisco",
            "company": "@github",
            "email": "",
            "websiteUrl": null,
            "twitterUsername": null,
            "repositories": { "nodes": [repo.clone()] },
            "projectsV2": { "nodes": [{
                "id": "P_1",
                "number": 1,
                "title": "Roadmap",
                "shortDescription": "What we ship next",
                "createdAt": "2024-02-01T00:00:00Z",
                "updatedAt": "2024-03-01T00:00:00Z",
                "url": "https://github.com/users/octocat/projects/1",
                "closed": false,
                "owner": { "__typename": "User", "login": "octocat", "avatarUrl": "https://avatars/octocat" },
                "creator": { "login": "octocat", "avatarUrl": "https://avatars/octocat" },
                "repositories": { "nodes": [repo] },
                "fields": { "nodes": [
                    { "__typename": "ProjectV2Field", "id": "F_title", "name": "Title" },
                    { "__typename": "ProjectV2SingleSelectField", "id": "F_status", "name": "Status",
                      "options": [
                        { "id": "opt_todo", "name": "Todo" },
                        { "id": "opt_doing", "name": "In Progress" },
                        { "id": "opt_done", "name": "Done" }
                      ] }
                ]},
                "items": { "nodes": [
                    {
                        "id": "PVTI_1",
                        "createdAt": "2024-02-02T00:00:00Z",
                        "updatedAt": "2024-02-03T00:00:00Z",
                        "fieldValues": { "nodes": [
                            { "__typename": "ProjectV2ItemFieldTextValue" },
                            { "__typename": "ProjectV2ItemFieldSingleSelectValue",
                              "name": "In Progress", "optionId": "opt_doing", "field": { "name": "Status" } }
                        ]},
                        "content": {
                            "__typename": "Issue",
                            "id": "I_1", "number": 7, "title": "Fix the login bug",
                            "body": "SSO is broken", "url": "https://github.com/octocat/widgets/issues/7",
                            "createdAt": "2024-02-02T00:00:00Z", "updatedAt": "2024-02-03T00:00:00Z",
                            "author": { "login": "hubot", "avatarUrl": "https://avatars/hubot" },
                            "assignees": { "nodes": [{ "login": "octocat", "avatarUrl": "https://avatars/octocat" }] },
                            "labels": { "nodes": [{ "id": "L_bug", "name": "bug", "color": "d73a4a" }] },
                            "repository": { "nameWithOwner": "octocat/widgets" }
                        }
                    },
                    {
                        "id": "PVTI_2",
                        "fieldValues": { "nodes": [] },
                        "content": {
                            "__typename": "Issue",
                            "id": "I_2", "number": 8, "title": "Write the docs",
                            "labels": { "nodes": [{ "id": "L_docs", "name": "docs", "color": "0075ca" }] }
                        }
                    },
                    {
                        "id": "PVTI_3",
                        "fieldValues": { "nodes": [
                            { "__typename": "ProjectV2ItemFieldSingleSelectValue",
                              "name": "Archived", "optionId": "opt_gone", "field": { "name": "Status" } }
                        ]},
                        "content": { "__typename": "DraftIssue", "id": "DI_1", "title": "Idea" }
                    },
                    {
                        "id": "PVTI_4",
                        "content": { "__typename": "PullRequest", "id": "PR_1" }
                    }
                ]}
            }]}
        }
    })
}
