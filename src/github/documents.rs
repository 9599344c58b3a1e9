//! GraphQL documents sent to GitHub.

pub const REPOSITORY_PAGE_SIZE: u32 = 100;
pub const PROJECT_PAGE_SIZE: u32 = 20;
pub const ITEM_PAGE_SIZE: u32 = 100;

/// Viewer, repositories and projects (with fields, items and linked
/// repositories) in one round trip.
pub const APP_DATA_QUERY: &str = r#"
query AppData($repoCount: Int!, $projectCount: Int!, $itemCount: Int!) {
  viewer {
    id login name avatarUrl bio location company email websiteUrl twitterUsername
    repositories(
      first: $repoCount
      orderBy: { field: UPDATED_AT, direction: DESC }
      ownerAffiliations: [OWNER, COLLABORATOR, ORGANIZATION_MEMBER]
    ) {
      nodes { ...RepositoryFields }
    }
    projectsV2(first: $projectCount, orderBy: { field: UPDATED_AT, direction: DESC }) {
      nodes {
        id number title shortDescription createdAt updatedAt url closed
        owner {
          __typename
          ... on User { login avatarUrl }
          ... on Organization { login avatarUrl }
        }
        creator { login avatarUrl }
        repositories(first: 10) { nodes { ...RepositoryFields } }
        fields(first: 20) {
          nodes {
            __typename
            ... on ProjectV2SingleSelectField { id name options { id name } }
            ... on ProjectV2FieldCommon { id name }
          }
        }
        items(first: $itemCount) {
          nodes {
            id createdAt updatedAt
            fieldValues(first: 20) {
              nodes {
                __typename
                ... on ProjectV2ItemFieldSingleSelectValue {
                  name optionId
                  field { ... on ProjectV2FieldCommon { name } }
                }
              }
            }
            content {
              __typename
              ... on Issue {
                id number title body url createdAt updatedAt
                author { login avatarUrl }
                assignees(first: 10) { nodes { login avatarUrl } }
                labels(first: 20) { nodes { id name color description } }
                repository { nameWithOwner }
              }
              ... on DraftIssue {
                id title body createdAt updatedAt
                creator { login avatarUrl }
                assignees(first: 10) { nodes { login avatarUrl } }
              }
            }
          }
        }
      }
    }
  }
}

fragment RepositoryFields on Repository {
  id name nameWithOwner description url createdAt
  owner { login avatarUrl }
  labels(first: 50) { nodes { id name color description } }
}
"#;

pub const REPOSITORY_COLLABORATORS_QUERY: &str = r#"
query RepositoryCollaborators($id: ID!) {
  node(id: $id) {
    ... on Repository {
      collaborators(first: 100) {
        edges { permission node { id login avatarUrl } }
      }
    }
  }
}
"#;

pub const CREATE_PROJECT: &str = r#"
mutation CreateProject($ownerId: ID!, $title: String!) {
  createProjectV2(input: { ownerId: $ownerId, title: $title }) {
    projectV2 { id number title url }
  }
}
"#;

pub const UPDATE_PROJECT: &str = r#"
mutation UpdateProject($projectId: ID!, $title: String, $shortDescription: String, $closed: Boolean) {
  updateProjectV2(input: {
    projectId: $projectId, title: $title, shortDescription: $shortDescription, closed: $closed
  }) {
    projectV2 { id }
  }
}
"#;

pub const DELETE_PROJECT: &str = r#"
mutation DeleteProject($projectId: ID!) {
  deleteProjectV2(input: { projectId: $projectId }) {
    projectV2 { id }
  }
}
"#;

pub const LINK_REPOSITORY: &str = r#"
mutation LinkRepository($projectId: ID!, $repositoryId: ID!) {
  linkProjectV2ToRepository(input: { projectId: $projectId, repositoryId: $repositoryId }) {
    repository { id }
  }
}
"#;

pub const UNLINK_REPOSITORY: &str = r#"
mutation UnlinkRepository($projectId: ID!, $repositoryId: ID!) {
  unlinkProjectV2FromRepository(input: { projectId: $projectId, repositoryId: $repositoryId }) {
    repository { id }
  }
}
"#;

pub const CREATE_ISSUE: &str = r#"
mutation CreateIssue($repositoryId: ID!, $title: String!, $body: String) {
  createIssue(input: { repositoryId: $repositoryId, title: $title, body: $body }) {
    issue { id number url }
  }
}
"#;

pub const ADD_PROJECT_ITEM: &str = r#"
mutation AddProjectItem($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: { projectId: $projectId, contentId: $contentId }) {
    item { id }
  }
}
"#;

pub const UPDATE_ITEM_STATUS: &str = r#"
mutation UpdateItemStatus($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId, itemId: $itemId, fieldId: $fieldId,
    value: { singleSelectOptionId: $optionId }
  }) {
    projectV2Item { id }
  }
}
"#;

pub const CLEAR_ITEM_STATUS: &str = r#"
mutation ClearItemStatus($projectId: ID!, $itemId: ID!, $fieldId: ID!) {
  clearProjectV2ItemFieldValue(input: { projectId: $projectId, itemId: $itemId, fieldId: $fieldId }) {
    projectV2Item { id }
  }
}
"#;

pub const UPDATE_ISSUE: &str = r#"
mutation UpdateIssue($id: ID!, $title: String, $body: String) {
  updateIssue(input: { id: $id, title: $title, body: $body }) {
    issue { id title body }
  }
}
"#;

pub const DELETE_PROJECT_ITEM: &str = r#"
mutation DeleteProjectItem($projectId: ID!, $itemId: ID!) {
  deleteProjectV2Item(input: { projectId: $projectId, itemId: $itemId }) {
    deletedItemId
  }
}
"#;

pub const DELETE_ISSUE: &str = r#"
mutation DeleteIssue($issueId: ID!) {
  deleteIssue(input: { issueId: $issueId }) {
    repository { id }
  }
}
"#;

pub const CREATE_LABEL: &str = r#"
mutation CreateLabel($repositoryId: ID!, $name: String!, $color: String!, $description: String) {
  createLabel(input: { repositoryId: $repositoryId, name: $name, color: $color, description: $description }) {
    label { id name color description }
  }
}
"#;

pub const UPDATE_LABEL: &str = r#"
mutation UpdateLabel($id: ID!, $name: String, $color: String, $description: String) {
  updateLabel(input: { id: $id, name: $name, color: $color, description: $description }) {
    label { id name color description }
  }
}
"#;

pub const DELETE_LABEL: &str = r#"
mutation DeleteLabel($id: ID!) {
  deleteLabel(input: { id: $id }) {
    clientMutationId
  }
}
"#;
